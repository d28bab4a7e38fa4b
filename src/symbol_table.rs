use crate::types::Type;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<(String, Type)>,
    pub return_type: Type,
    pub variables: BTreeMap<String, VariableSymbol>,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>, parameters: Vec<(String, Type)>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            variables: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Function '{0}' is not defined.")]
    UnknownFunction(String),
    #[error("Variable '{0}' already declared.")]
    DuplicateVariable(String),
}

/// Functions by name, each owning a flat scope of variables. Entries are
/// only ever added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymbolTable {
    functions: BTreeMap<String, FunctionSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a function with the same name already exists.
    pub fn add_function(&mut self, function: FunctionSymbol) -> bool {
        if self.functions.contains_key(&function.name) {
            return false;
        }
        self.functions.insert(function.name.clone(), function);
        true
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionSymbol> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionSymbol> {
        self.functions.values()
    }

    pub fn add_variable(&mut self, function: &str, variable: VariableSymbol) -> Result<(), SymbolError> {
        let scope = &mut self
            .functions
            .get_mut(function)
            .ok_or_else(|| SymbolError::UnknownFunction(function.to_string()))?
            .variables;

        if scope.contains_key(&variable.name) {
            return Err(SymbolError::DuplicateVariable(variable.name));
        }
        scope.insert(variable.name.clone(), variable);
        Ok(())
    }

    pub fn get_variable(&self, function: &str, name: &str) -> Option<&VariableSymbol> {
        self.functions.get(function)?.variables.get(name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
