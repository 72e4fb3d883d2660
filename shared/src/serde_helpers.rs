//! Record id (de)serialization
//!
//! 记录引用对外统一是 "table:id" 字符串，数据库返回的则是 SurrealDB
//! 原生结构。反序列化两种都接受，序列化总是输出字符串。

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// 缺省为 true 的 bool 字段 (null 也按 true 处理)
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<bool>::deserialize(deserializer)?;
    Ok(value.unwrap_or(true))
}

/// 两种来源的记录引用
///
/// 原生格式不是自描述的 map，不能走 untagged enum，必须用 visitor
/// 按输入形态分派。
struct CompatRecordId(RecordId);

impl<'de> Deserialize<'de> for CompatRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CompatVisitor;

        impl<'de> Visitor<'de> for CompatVisitor {
            type Value = CompatRecordId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a record id, \"table:id\" or native form")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(CompatRecordId)
                    .map_err(|_| E::custom(format!("invalid record id: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // 原生格式委托给 RecordId 自己的反序列化
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(CompatRecordId)
            }
        }

        deserializer.deserialize_any(CompatVisitor)
    }
}

/// `#[serde(with = "serde_helpers::record_id")]`
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        CompatRecordId::deserialize(d).map(|c| c.0)
    }
}

/// `#[serde(default, with = "serde_helpers::option_record_id")]`
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<CompatRecordId>::deserialize(d).map(|opt| opt.map(|c| c.0))
    }
}
