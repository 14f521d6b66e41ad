//! Call descriptors handed to the settlement engine.
//!
//! The engine knows nothing about auctions: it only invokes a descriptor
//! and reads back a value.

use soroban_sdk::{contracttype, Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec};

/// A fully bound contract call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

impl Call {
    pub fn new(target: &Address, function: Symbol, args: Vec<Val>) -> Self {
        Call {
            target: target.clone(),
            function,
            args,
        }
    }

    pub fn invoke<T>(&self, env: &Env) -> T
    where
        T: TryFromVal<Env, Val>,
    {
        env.invoke_contract(&self.target, &self.function, self.args.clone())
    }
}

/// A contract call with every argument bound except a trailing amount,
/// which the engine supplies at fill time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AmountGetter {
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

impl AmountGetter {
    pub fn new(target: &Address, function: Symbol, args: Vec<Val>) -> Self {
        AmountGetter {
            target: target.clone(),
            function,
            args,
        }
    }

    /// Calls the target with `amount` appended to the bound arguments.
    pub fn invoke(&self, env: &Env, amount: i128) -> i128 {
        let mut args = self.args.clone();
        args.push_back(amount.into_val(env));
        env.invoke_contract(&self.target, &self.function, args)
    }
}
