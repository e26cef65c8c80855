//! Plugin Registry

use crate::{FunctionPlugin, FunctionMeta};
use crate::EvalContext;
use measure_core::{MeasureError, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Central plugin registry
#[derive(Default)]
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => f.call(args, ctx),
            None => {
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = MeasureError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Value::Object(function_to_help(f.meta())),
            None => Value::Error(MeasureError::not_found(format!("No function named '{}'", name))),
        }
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, f) in &self.functions {
            let cat = f.meta().category.to_string();
            funcs_by_cat.entry(cat).or_default().push(name.clone());
        }

        let mut help = BTreeMap::new();
        help.insert("functions".to_string(),
            Value::Object(funcs_by_cat.into_iter()
                .map(|(k, mut v)| {
                    v.sort();
                    (k, Value::List(v.into_iter().map(Value::Text).collect()))
                })
                .collect()));
        help.insert("usage".to_string(),
            Value::Text("Call help('function_name') for detailed help.".to_string()));

        Value::Object(help)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let mut metas: Vec<FunctionMeta> = self.functions.values()
            .map(|f| f.meta())
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect();
        metas.sort_by_key(|m| m.name);

        Value::List(metas.into_iter()
            .map(|meta| Value::object([
                ("name", Value::from(meta.name)),
                ("description", Value::from(meta.description)),
                ("usage", Value::from(meta.usage)),
                ("category", Value::from(meta.category)),
            ]))
            .collect())
    }
}

fn function_to_help(meta: FunctionMeta) -> BTreeMap<String, Value> {
    let mut help = BTreeMap::new();
    help.insert("name".to_string(), Value::from(meta.name));
    help.insert("type".to_string(), Value::from("function"));
    help.insert("description".to_string(), Value::from(meta.description));
    help.insert("usage".to_string(), Value::from(meta.usage));
    help.insert("returns".to_string(), Value::from(meta.returns));
    help.insert("category".to_string(), Value::from(meta.category));
    help.insert("args".to_string(), Value::List(
        meta.args.iter().map(|a| Value::object([
            ("name", Value::from(a.name)),
            ("type", Value::from(a.typ)),
            ("description", Value::from(a.description)),
            ("optional", Value::Bool(a.optional)),
        ])).collect()
    ));
    help.insert("examples".to_string(), Value::List(
        meta.examples.iter().map(|e| Value::from(*e)).collect()
    ));
    help.insert("related".to_string(), Value::List(
        meta.related.iter().map(|r| Value::from(*r)).collect()
    ));
    help
}

/// Calculate similarity score between two strings
fn similarity_score(query: &str, candidate: &str) -> usize {
    let mut score = 0;

    // Exact prefix match is best
    if candidate.starts_with(query) {
        score += 100;
    }
    // Contains the query
    else if candidate.contains(query) {
        score += 50;
    }
    // Query contains the candidate
    else if query.contains(candidate) {
        score += 30;
    }

    // Count shared characters
    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    let common = query_chars.intersection(&candidate_chars).count();
    score += common * 2;

    // Penalize length difference
    let len_diff = (query.len() as i32 - candidate.len() as i32).unsigned_abs() as usize;
    if len_diff < 5 && score > 0 {
        score += 5 - len_diff;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Echo;

    static ECHO_ARGS: [ArgMeta; 1] = [ArgMeta::required("value", "Any", "Value to echo")];

    impl FunctionPlugin for Echo {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "echo",
                description: "Return the first argument",
                usage: "echo(value)",
                args: &ECHO_ARGS,
                returns: "Any",
                examples: &["echo(1) → 1"],
                category: "test",
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            args.first().cloned().unwrap_or(Value::Null)
        }
    }

    #[test]
    fn test_register_and_call() {
        let registry = PluginRegistry::new().with_function(Echo);
        let result = registry.call_function("ECHO", &[Value::from(3.0)], &EvalContext::new());
        assert_eq!(result, Value::Number(3.0));
        assert_eq!(registry.function_count(), 1);
    }

    #[test]
    fn test_unknown_function_suggests_similar() {
        let registry = PluginRegistry::new().with_function(Echo);
        let result = registry.call_function("ech", &[], &EvalContext::new());
        let err = result.as_error().unwrap();
        assert!(err.is(measure_core::codes::UNDEFINED_FUNC));
        assert!(err.suggestion.as_deref().unwrap().contains("echo"));
    }

    #[test]
    fn test_help() {
        let registry = PluginRegistry::new().with_function(Echo);
        let help = registry.help(Some("echo"));
        assert_eq!(help.get("usage").as_text(), Some("echo(value)"));
        assert!(registry.help(Some("nope")).is_error());

        let general = registry.help(None);
        let test_funcs = general.get("functions").get("test");
        assert_eq!(test_funcs.as_list().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_list_functions_filters_by_category() {
        let registry = PluginRegistry::new().with_function(Echo);
        assert_eq!(registry.list_functions(Some("test")).as_list().unwrap().len(), 1);
        assert!(registry.list_functions(Some("units")).as_list().unwrap().is_empty());
    }
}
