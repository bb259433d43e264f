//! Tool descriptors: the calling contract advertised to a model.

use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::docs::parse_doc;

/// JSON schema type advertised for a parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Free text. Used whenever no type is declared.
    #[default]
    String,
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Ordered sequences.
    Array,
    /// Key/value maps and structured values.
    Object,
}

impl TypeTag {
    /// Returns the schema name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One formal parameter of a tool signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    type_tag: Option<TypeTag>,
    has_default: bool,
}

impl Parameter {
    /// A parameter without a default value.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: None,
            has_default: false,
        }
    }

    /// A parameter that falls back to a default when omitted.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: None,
            has_default: true,
        }
    }

    /// Declares the parameter type.
    #[must_use]
    pub fn with_type(mut self, type_tag: TypeTag) -> Self {
        self.type_tag = Some(type_tag);
        self
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, if any.
    #[must_use]
    pub const fn type_tag(&self) -> Option<TypeTag> {
        self.type_tag
    }

    /// Whether the signature supplies a default.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.has_default
    }
}

/// Parameter entry of a built descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    type_tag: TypeTag,
    description: String,
}

impl ParameterDescriptor {
    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Advertised type.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Documentation text; empty when undocumented.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Serialize for ParameterDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParameterDescriptor", 2)?;
        state.serialize_field("type", &self.type_tag)?;
        state.serialize_field("description", &self.description)?;
        state.end()
    }
}

/// Immutable description of how to call a tool.
///
/// Serializes to the provider-facing function shape:
///
/// ```json
/// { "type": "function",
///   "function": { "name": "...", "description": "...",
///                 "parameters": { "type": "object", "properties": {}, "required": [] } } }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParameterDescriptor>,
    required: Vec<String>,
    returns: Option<String>,
}

impl ToolDescriptor {
    /// Starts a descriptor for the named tool.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name)
    }

    /// Tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leading prose of the documentation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in signature order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// Names of parameters without a default, in signature order.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Return value documentation. Not part of the serialized shape.
    #[must_use]
    pub fn returns(&self) -> Option<&str> {
        self.returns.as_deref()
    }

    /// Required parameters that carry no documentation.
    #[must_use]
    pub fn undocumented_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|param| param.description.is_empty() && self.required.contains(&param.name))
            .map(|param| param.name.as_str())
            .collect()
    }

    /// Serializes into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        // The Serialize impl only emits strings and maps.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Renders the descriptor as 4-space indented JSON. Non-ASCII text is
    /// kept as-is.
    #[must_use]
    pub fn to_tool_json(&self) -> String {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        if self.serialize(&mut serializer).is_err() {
            return String::new();
        }
        String::from_utf8(out).unwrap_or_default()
    }
}

struct Properties<'a>(&'a [ParameterDescriptor]);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for param in self.0 {
            map.serialize_entry(&param.name, param)?;
        }
        map.end()
    }
}

struct ParametersSchema<'a>(&'a ToolDescriptor);

impl Serialize for ParametersSchema<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Parameters", 3)?;
        state.serialize_field("type", "object")?;
        state.serialize_field("properties", &Properties(&self.0.parameters))?;
        state.serialize_field("required", &self.0.required)?;
        state.end()
    }
}

struct FunctionSchema<'a>(&'a ToolDescriptor);

impl Serialize for FunctionSchema<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Function", 3)?;
        state.serialize_field("name", &self.0.name)?;
        state.serialize_field("description", &self.0.description)?;
        state.serialize_field("parameters", &ParametersSchema(self.0))?;
        state.end()
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ToolDescriptor", 2)?;
        state.serialize_field("type", "function")?;
        state.serialize_field("function", &FunctionSchema(self))?;
        state.end()
    }
}

/// Derives a [`ToolDescriptor`] from a signature and its documentation.
///
/// Building never fails. Missing or partial documentation degrades to empty
/// descriptions.
#[derive(Clone, Debug)]
pub struct DescriptorBuilder {
    name: String,
    doc: Option<String>,
    parameters: Vec<Parameter>,
}

impl DescriptorBuilder {
    /// Starts a builder for the named tool.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            parameters: Vec::new(),
        }
    }

    /// Attaches the documentation comment.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a formal parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several formal parameters.
    #[must_use]
    pub fn parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = Parameter>,
    {
        self.parameters.extend(parameters);
        self
    }

    /// Finalises the descriptor.
    #[must_use]
    pub fn build(self) -> ToolDescriptor {
        let parsed = self.doc.as_deref().map(parse_doc).unwrap_or_default();

        for (documented, _) in parsed.params() {
            if !self.parameters.iter().any(|p| p.name == *documented) {
                debug!(
                    tool = %self.name,
                    parameter = %documented,
                    "documented parameter is not in the signature"
                );
            }
        }

        let mut required = Vec::new();
        let parameters = self
            .parameters
            .into_iter()
            .map(|param| {
                if !param.has_default {
                    required.push(param.name.clone());
                }
                let description = parsed.param(&param.name).unwrap_or_default().to_owned();
                if description.is_empty() {
                    debug!(tool = %self.name, parameter = %param.name, "parameter is undocumented");
                }
                ParameterDescriptor {
                    type_tag: param.type_tag.unwrap_or_default(),
                    description,
                    name: param.name,
                }
            })
            .collect();

        ToolDescriptor {
            description: parsed.description().to_owned(),
            returns: parsed.returns().map(ToOwned::to_owned),
            name: self.name,
            parameters,
            required,
        }
    }
}
