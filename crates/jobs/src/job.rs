//! Job and task messages
//!
//! Field tags follow the published Switchboard `OracleJob` schema so that
//! encoded jobs are accepted by the simulation service and hash to the
//! same feed hash the oracles compute. Only the task kinds this tool builds
//! are modelled.

use serde::{Deserialize, Serialize};

/// A list of tasks run in sequence; each task consumes the previous result
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct OracleJob {
    #[prost(message, repeated, tag = "1")]
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl OracleJob {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn single(kind: task::Task) -> Self {
        Self::new(vec![Task::from(kind)])
    }
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    #[prost(oneof = "task::Task", tags = "1, 2, 4, 8, 12, 23")]
    pub task: Option<task::Task>,
}

impl From<task::Task> for Task {
    fn from(kind: task::Task) -> Self {
        Self { task: Some(kind) }
    }
}

pub mod task {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Task {
        #[prost(message, tag = "1")]
        HttpTask(super::HttpTask),
        #[prost(message, tag = "2")]
        JsonParseTask(super::JsonParseTask),
        #[prost(message, tag = "4")]
        MedianTask(super::MedianTask),
        #[prost(message, tag = "8")]
        MultiplyTask(super::MultiplyTask),
        #[prost(message, tag = "12")]
        ValueTask(super::ValueTask),
        #[prost(message, tag = "23")]
        JupiterSwapTask(super::JupiterSwapTask),
    }
}

/// Fetch a URL; the response body becomes the task result
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpTask {
    #[prost(string, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[prost(enumeration = "http_task::Method", optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none", with = "method_name")]
    pub method: Option<i32>,
    #[prost(message, repeated, tag = "3")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<http_task::Header>,
    #[prost(string, optional, tag = "4")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

pub mod http_task {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    pub struct Header {
        #[prost(string, optional, tag = "1")]
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub key: Option<String>,
        #[prost(string, optional, tag = "2")]
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub value: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum Method {
        Null = 0,
        Get = 1,
        Post = 2,
    }
}

/// Extract a number from the previous task's JSON with a JSONPath
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonParseTask {
    #[prost(string, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[prost(enumeration = "json_parse_task::AggregationMethod", optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none", with = "aggregation_name")]
    pub aggregation_method: Option<i32>,
}

pub mod json_parse_task {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum AggregationMethod {
        None = 0,
        Min = 1,
        Max = 2,
        Sum = 3,
        Mean = 4,
        Median = 5,
    }
}

/// Median over sub-tasks or sub-jobs
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianTask {
    #[prost(message, repeated, tag = "1")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
    #[prost(message, repeated, tag = "2")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<OracleJob>,
    #[prost(int32, optional, tag = "3")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_successful_required: Option<i32>,
}

/// Multiply the running result
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct MultiplyTask {
    #[prost(oneof = "multiply_task::Multiple", tags = "1, 2, 3, 4")]
    #[serde(flatten)]
    pub multiple: Option<multiply_task::Multiple>,
}

pub mod multiply_task {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Multiple {
        #[prost(double, tag = "1")]
        Scalar(f64),
        #[prost(string, tag = "2")]
        AggregatorPubkey(String),
        #[prost(message, tag = "3")]
        Job(super::OracleJob),
        #[prost(string, tag = "4")]
        Big(String),
    }
}

/// Constant value, or the latest value of another feed
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct ValueTask {
    #[prost(oneof = "value_task::Value", tags = "1, 2, 3")]
    #[serde(flatten)]
    pub value: Option<value_task::Value>,
}

pub mod value_task {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Value {
        #[prost(double, tag = "1")]
        Value(f64),
        #[prost(string, tag = "2")]
        AggregatorPubkey(String),
        #[prost(string, tag = "3")]
        Big(String),
    }
}

/// Quote a swap through the Jupiter aggregator
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterSwapTask {
    #[prost(string, optional, tag = "1")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_token_address: Option<String>,
    #[prost(string, optional, tag = "2")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_token_address: Option<String>,
    #[prost(oneof = "jupiter_swap_task::SwapAmount", tags = "3, 6, 7, 8")]
    #[serde(flatten)]
    pub swap_amount: Option<jupiter_swap_task::SwapAmount>,
    #[prost(double, optional, tag = "9")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage: Option<f64>,
}

pub mod jupiter_swap_task {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum SwapAmount {
        #[prost(double, tag = "3")]
        BaseAmount(f64),
        #[prost(double, tag = "6")]
        QuoteAmount(f64),
        #[prost(string, tag = "7")]
        BaseAmountString(String),
        #[prost(string, tag = "8")]
        QuoteAmountString(String),
    }
}

/// JSON uses the schema's enum names; the wire uses the numbers
mod method_name {
    use super::http_task::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<i32>, s: S) -> Result<S::Ok, S::Error> {
        let name = match value.and_then(|v| Method::try_from(v).ok()) {
            Some(Method::Get) => "METHOD_GET",
            Some(Method::Post) => "METHOD_POST",
            _ => "METHOD_NULL",
        };
        s.serialize_str(name)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        let name = Option::<String>::deserialize(d)?;
        Ok(name.map(|n| match n.as_str() {
            "METHOD_GET" => Method::Get as i32,
            "METHOD_POST" => Method::Post as i32,
            _ => Method::Null as i32,
        }))
    }
}

mod aggregation_name {
    use super::json_parse_task::AggregationMethod;
    use serde::{Deserialize, Deserializer, Serializer};

    const NAMES: [(&str, AggregationMethod); 6] = [
        ("NONE", AggregationMethod::None),
        ("MIN", AggregationMethod::Min),
        ("MAX", AggregationMethod::Max),
        ("SUM", AggregationMethod::Sum),
        ("MEAN", AggregationMethod::Mean),
        ("MEDIAN", AggregationMethod::Median),
    ];

    pub fn serialize<S: Serializer>(value: &Option<i32>, s: S) -> Result<S::Ok, S::Error> {
        let method = value
            .and_then(|v| AggregationMethod::try_from(v).ok())
            .unwrap_or(AggregationMethod::None);
        let name = NAMES
            .iter()
            .find(|(_, m)| *m == method)
            .map(|(n, _)| *n)
            .unwrap_or("NONE");
        s.serialize_str(name)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        let name = Option::<String>::deserialize(d)?;
        Ok(name.map(|n| {
            NAMES
                .iter()
                .find(|(candidate, _)| *candidate == n)
                .map(|(_, m)| *m as i32)
                .unwrap_or(AggregationMethod::None as i32)
        }))
    }
}
