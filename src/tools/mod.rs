//! Tool catalogs and the dispatcher.
//!
//! Each vendor declares one ordered slice of [`ToolDef`]. The advertised
//! `tools/list` payload and the call routing are both generated from that
//! slice, so a tool cannot be listed without being callable or vice versa.

mod args;
pub mod fortigate;
pub mod meraki;

pub use args::{Arguments, Ident, Timespan};

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Primitive type of a tool parameter as advertised in its input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
}

impl ParamKind {
    fn schema_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::String => {
                matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
            }
            // numeric strings are checked by the typed record
            ParamKind::Number => matches!(value, Value::Number(_) | Value::String(_)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
        }
    }

    /// Reject values of the wrong shape, naming the parameter. `null` is left
    /// to the required check.
    fn check(&self, args: &Arguments) -> Result<(), ToolError> {
        match args.get(self.name) {
            Some(v) if !v.is_null() && !self.kind.accepts(v) => {
                Err(ToolError::invalid_params(format!(
                    "Invalid parameter {}: expected a {}, got {}",
                    self.name,
                    self.kind.schema_type(),
                    args::type_name(v)
                )))
            }
            _ => Ok(()),
        }
    }
}

/// How a tool turns its arguments into an upstream path.
#[derive(Debug, Clone, Copy)]
pub enum Route {
    /// Fixed path, arguments ignored.
    Fixed(&'static str),
    /// Path built from typed arguments.
    Build(fn(&Arguments) -> Result<UpstreamRequest, ToolError>),
}

#[derive(Debug, Clone, Copy)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [Param],
    pub route: Route,
}

impl ToolDef {
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for p in self.params {
            properties.insert(
                p.name.to_string(),
                json!({ "type": p.kind.schema_type(), "description": p.description }),
            );
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }

    fn route(&self, args: &Arguments) -> Result<UpstreamRequest, ToolError> {
        for p in self.params.iter().filter(|p| p.required) {
            if !args.is_present(p.name) {
                return Err(ToolError::missing(p.name));
            }
        }
        for p in self.params {
            p.check(args)?;
        }
        match self.route {
            Route::Fixed(path) => Ok(UpstreamRequest::new(path)),
            Route::Build(build) => build(args),
        }
    }
}

/// Catalog entry as it appears in a `tools/list` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One GET against the vendor API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub endpoint: String,
}

impl UpstreamRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    tools: &'static [ToolDef],
}

impl Catalog {
    pub const fn new(tools: &'static [ToolDef]) -> Self {
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&'static ToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(ToolDef::descriptor).collect()
    }

    /// Map a tool call to its upstream request without touching the network.
    pub fn resolve(&self, name: &str, args: &Arguments) -> Result<UpstreamRequest, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::MethodNotFound(name.to_string()))?;
        tool.route(args)
    }
}

/// Shared by both vendors: forward the caller's path untouched.
#[derive(Debug, Deserialize)]
struct EndpointArgs {
    endpoint: Ident,
}

pub(crate) fn passthrough(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
    let parsed: EndpointArgs = args.parse()?;
    Ok(UpstreamRequest::new(parsed.endpoint.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PARAMS: &[Param] = &[
        Param::required("siteId", ParamKind::String, "Site ID"),
        Param::optional("limit", ParamKind::Number, "Row limit"),
    ];

    fn site_route(args: &Arguments) -> Result<UpstreamRequest, ToolError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct SiteArgs {
            site_id: Ident,
        }
        let a: SiteArgs = args.parse()?;
        Ok(UpstreamRequest::new(format!("/sites/{}", a.site_id.segment())))
    }

    const TOOLS: &[ToolDef] = &[
        ToolDef {
            name: "get_sites",
            description: "List sites",
            params: &[],
            route: Route::Fixed("/sites"),
        },
        ToolDef {
            name: "get_site",
            description: "One site",
            params: PARAMS,
            route: Route::Build(site_route),
        },
    ];

    const CATALOG: Catalog = Catalog::new(TOOLS);

    fn args(v: Value) -> Arguments {
        Arguments::from_value(Some(v)).unwrap()
    }

    #[test]
    fn schema_lists_properties_and_required() {
        let schema = TOOLS[1].input_schema();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "siteId": {"type": "string", "description": "Site ID"},
                    "limit": {"type": "number", "description": "Row limit"}
                },
                "required": ["siteId"]
            })
        );
    }

    #[test]
    fn schema_of_argumentless_tool_is_empty_object() {
        assert_eq!(
            TOOLS[0].input_schema(),
            json!({"type": "object", "properties": {}, "required": []})
        );
    }

    #[test]
    fn descriptors_keep_declaration_order() {
        let names: Vec<String> = CATALOG.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["get_sites", "get_site"]);
    }

    #[test]
    fn descriptor_serializes_camel_case_schema_key() {
        let v = serde_json::to_value(TOOLS[0].descriptor()).unwrap();
        assert!(v.get("inputSchema").is_some());
        assert!(v.get("input_schema").is_none());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let err = CATALOG.resolve("GET_SITES", &Arguments::default()).unwrap_err();
        assert!(matches!(err, ToolError::MethodNotFound(ref n) if n == "GET_SITES"));
    }

    #[test]
    fn fixed_route_ignores_arguments() {
        let req = CATALOG.resolve("get_sites", &args(json!({"junk": true}))).unwrap();
        assert_eq!(req.endpoint, "/sites");
    }

    #[test]
    fn missing_required_argument_names_field() {
        let err = CATALOG.resolve("get_site", &args(json!({"limit": 3}))).unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: siteId");
    }

    #[test]
    fn built_route_interpolates_identifier() {
        let req = CATALOG.resolve("get_site", &args(json!({"siteId": "S-1"}))).unwrap();
        assert_eq!(req.endpoint, "/sites/S-1");
    }

    #[test]
    fn wrong_shaped_arguments_name_the_field() {
        let err = CATALOG
            .resolve("get_site", &args(json!({"siteId": ["S-1"]})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(_)));
        assert_eq!(err.to_string(), "Invalid parameter siteId: expected a string, got array");

        let err = CATALOG
            .resolve("get_site", &args(json!({"siteId": "S-1", "limit": {"n": 3}})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter limit: expected a number, got object");
    }

    #[test]
    fn passthrough_coerces_numeric_endpoint() {
        let req = passthrough(&args(json!({"endpoint": 5}))).unwrap();
        assert_eq!(req.endpoint, "5");
    }

    #[test]
    fn passthrough_keeps_path_verbatim() {
        let req = passthrough(&args(json!({"endpoint": "/custom/path?x=1&y=%20"}))).unwrap();
        assert_eq!(req.endpoint, "/custom/path?x=1&y=%20");
    }
}
