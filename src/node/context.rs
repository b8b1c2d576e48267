//! Execution context supplied by the host

use super::item::Item;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the node can see of the host while executing
pub trait ExecutionContext {
    /// Incoming items, in order
    fn items(&self) -> &[Item];

    /// Value of a parameter as resolved for the given item
    fn parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Whether per-item failures should be captured instead of aborting
    fn continue_on_fail(&self) -> bool;
}

/// Context backed by plain data: shared parameters, optional per-item overrides.
///
/// Also the wire format of an execution request (`{ items, parameters,
/// itemParameters, continueOnFail }`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticContext {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Index-aligned with `items`; entries override `parameters`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_parameters: Vec<Map<String, Value>>,
    #[serde(default)]
    pub continue_on_fail: bool,
}

impl StaticContext {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }

    pub fn with_item_parameter(mut self, index: usize, name: &str, value: impl Into<Value>) -> Self {
        if self.item_parameters.len() <= index {
            self.item_parameters.resize_with(index + 1, Map::new);
        }
        self.item_parameters[index].insert(name.to_string(), value.into());
        self
    }

    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }
}

impl ExecutionContext for StaticContext {
    fn items(&self) -> &[Item] {
        &self.items
    }

    fn parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.item_parameters
            .get(item_index)
            .and_then(|overrides| overrides.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shared_parameter() {
        let ctx = StaticContext::new(vec![Item::default(), Item::default()])
            .with_parameter("worksheetName", "Report");
        assert_eq!(ctx.parameter("worksheetName", 0), Some(json!("Report")));
        assert_eq!(ctx.parameter("worksheetName", 1), Some(json!("Report")));
        assert_eq!(ctx.parameter("fileName", 0), None);
    }

    #[test]
    fn test_item_override_wins() {
        let ctx = StaticContext::new(vec![Item::default(), Item::default()])
            .with_parameter("fileName", "all.xlsx")
            .with_item_parameter(1, "fileName", "second.xlsx");
        assert_eq!(ctx.parameter("fileName", 0), Some(json!("all.xlsx")));
        assert_eq!(ctx.parameter("fileName", 1), Some(json!("second.xlsx")));
    }

    #[test]
    fn test_deserialize_request() {
        let text = r#"{
            "items": [{"json": {"data": [{"a": 1}]}}],
            "parameters": {"inputMode": "nativeArray", "inputField": "data"},
            "continueOnFail": true
        }"#;
        let ctx: StaticContext = serde_json::from_str(text).unwrap();
        assert_eq!(ctx.items().len(), 1);
        assert!(ctx.continue_on_fail());
        assert_eq!(ctx.parameter("inputMode", 0), Some(json!("nativeArray")));
    }

    #[test]
    fn test_deserialize_defaults() {
        let ctx: StaticContext = serde_json::from_str("{}").unwrap();
        assert!(ctx.items().is_empty());
        assert!(!ctx.continue_on_fail());
    }
}
