//! Tako Data Format model.
//!
//! Datasets sent to `visualize_dataset` are checked against this model before
//! any remote call, so a malformed payload comes back with a diagnostic the
//! caller can act on.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A tidy dataset: one variable per column, one observation per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TakoDataFormatDataset {
    /// Title shown above the visualization.
    pub title: String,
    /// Optional longer description of what the dataset measures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column definitions. Every row key must name one of these variables.
    pub variables: Vec<TakoDataFormatVariable>,
    /// Observations keyed by variable name. Missing values are `null`.
    ///
    /// Cells must match their variable's `type`: `number` cells are JSON
    /// numbers, `boolean` cells are `true`/`false`, and `string`, `date` and
    /// `datetime` cells are JSON strings (a year is `"2020"`, not `2020`).
    pub rows: Vec<Map<String, Value>>,
}

/// Column definition with visualization metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TakoDataFormatVariable {
    /// Column name, unique within the dataset.
    pub name: String,
    /// Value type of every non-null cell in this column. `date` and
    /// `datetime` cells are strings formatted per `timeseries_metadata.format`.
    #[serde(rename = "type")]
    pub kind: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit label such as `USD` or `%`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sortable: Option<bool>,
    /// Whether larger values are better (drives color scales).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_higher_better: Option<bool>,
    /// Set for variables suited to timeseries charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeseries_metadata: Option<TimeseriesMetadata>,
    /// Set for variables suited to categorical bar charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical_metadata: Option<CategoricalMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Boolean,
    Date,
    Datetime,
}

impl VariableType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
        }
    }

    /// Returns true if `value` is a valid cell for this column type.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::String | Self::Date | Self::Datetime, Value::String(_))
                | (Self::Number, Value::Number(_))
                | (Self::Boolean, Value::Bool(_))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeseriesMetadata {
    /// Marks the column used as the time axis.
    #[serde(default)]
    pub is_time_axis: bool,
    /// Date format of the cells, e.g. `%Y-%m-%d` or `%Y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CategoricalMetadata {
    /// Marks the column used as the category axis.
    #[serde(default)]
    pub is_category_axis: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
    #[serde(rename = "none")]
    Unsorted,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset does not match the Tako Data Format: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("dataset failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl TakoDataFormatDataset {
    /// Parses and validates an arbitrary JSON object as a dataset.
    ///
    /// # Errors
    /// Returns `DatasetError::Shape` if the object does not deserialize and
    /// `DatasetError::Invalid` if it deserializes but breaks a dataset rule.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, DatasetError> {
        let dataset: Self =
            serde_json::from_value(Value::Object(map)).map_err(DatasetError::Shape)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks the cross-field rules that the type system cannot express.
    ///
    /// # Errors
    /// Returns `DatasetError::Invalid` listing every rule violation found.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push("title must not be blank".to_string());
        }
        if self.variables.is_empty() {
            issues.push("variables must declare at least one variable".to_string());
        }

        let mut declared: HashMap<&str, VariableType> = HashMap::new();
        for (index, variable) in self.variables.iter().enumerate() {
            if variable.name.trim().is_empty() {
                issues.push(format!("variables[{index}].name must not be blank"));
                continue;
            }
            if declared.insert(variable.name.as_str(), variable.kind).is_some() {
                issues.push(format!(
                    "variables[{index}].name `{}` is declared more than once",
                    variable.name
                ));
            }
        }

        if self.rows.is_empty() {
            issues.push("rows must contain at least one observation".to_string());
        }
        for (row_index, row) in self.rows.iter().enumerate() {
            for (column, value) in row {
                match declared.get(column.as_str()) {
                    None => issues.push(format!(
                        "rows[{row_index}].{column} is not a declared variable"
                    )),
                    Some(kind) if !kind.accepts(value) => issues.push(format!(
                        "rows[{row_index}].{column}: expected {}, found {}",
                        kind.as_str(),
                        json_type_name(value)
                    )),
                    Some(_) => {}
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(DatasetError::Invalid(issues))
        }
    }

    /// JSON Schema for the dataset format, as embedded in prompts.
    #[must_use]
    pub fn json_schema() -> Value {
        serde_json::to_value(schemars::schema_for!(Self)).unwrap_or_default()
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
