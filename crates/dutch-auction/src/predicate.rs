//! Cancellation predicates evaluated by the settlement engine before a fill.

use soroban_sdk::{contracttype, vec, Address, Env, IntoVal, Symbol, Vec};

use crate::call::Call;

pub const NONCE_EQUALS: &str = "nonce_equals";
pub const TIMESTAMP_BELOW: &str = "timestamp_below";

/// Conjunction of boolean conditions, evaluated left to right.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Predicate {
    pub conditions: Vec<Call>,
}

impl Predicate {
    /// A predicate with no conditions, which always holds.
    pub fn always(env: &Env) -> Self {
        Predicate {
            conditions: Vec::new(env),
        }
    }

    /// True only if every condition holds. Stops at the first false one.
    pub fn evaluate(&self, env: &Env) -> bool {
        for condition in self.conditions.iter() {
            if !condition.invoke::<bool>(env) {
                return false;
            }
        }
        true
    }
}

pub fn compose_and(env: &Env, conditions: &[Call]) -> Predicate {
    let mut all = Vec::new(env);
    for condition in conditions {
        all.push_back(condition.clone());
    }
    Predicate { conditions: all }
}

/// Holds while `owner`'s nonce recorded by `helper` equals `expected_nonce`.
pub fn nonce_condition(env: &Env, helper: &Address, owner: &Address, expected_nonce: u64) -> Call {
    Call::new(
        helper,
        Symbol::new(env, NONCE_EQUALS),
        vec![env, owner.into_val(env), expected_nonce.into_val(env)],
    )
}

/// Holds while the ledger time is strictly before `deadline`.
pub fn time_condition(env: &Env, helper: &Address, deadline: u64) -> Call {
    Call::new(
        helper,
        Symbol::new(env, TIMESTAMP_BELOW),
        vec![env, deadline.into_val(env)],
    )
}
