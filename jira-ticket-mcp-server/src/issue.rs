//! JIRA issue data model
//!
//! Deserialization targets for `GET /rest/api/3/issue/{key}`. Open-ended
//! values (custom fields, rich text) are classified here, once, while the
//! response is decoded, so the formatting code never inspects raw JSON.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Prefix shared by every custom field id
pub const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// A JIRA issue as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,

    /// Canonical API URL of the issue
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,

    pub fields: IssueFields,
}

/// Issue fields
///
/// Every field the server asked for but does not know by name ends up in
/// `other`, already classified.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub reporter: Option<User>,
    #[serde(default)]
    pub priority: Option<NamedEntity>,
    #[serde(default)]
    pub issuetype: Option<NamedEntity>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub description: Option<RichText>,
    #[serde(default)]
    pub parent: Option<ParentIssue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fix_versions: Vec<FixVersion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuelinks: Vec<IssueLink>,
    #[serde(default)]
    pub comment: Option<CommentPage>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,

    #[serde(flatten)]
    pub other: BTreeMap<String, FieldValue>,
}

impl IssueFields {
    /// Look up a custom field by id
    pub fn custom_field(&self, field_id: &str) -> &FieldValue {
        self.other.get(field_id).unwrap_or(&FieldValue::Absent)
    }

    /// All custom fields in field-id order
    pub fn custom_fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.other
            .iter()
            .filter(|(id, _)| id.starts_with(CUSTOM_FIELD_PREFIX))
            .map(|(id, value)| (id.as_str(), value))
    }

    pub fn status_name(&self) -> &str {
        self.status.as_ref().map_or("Unknown", |s| s.name.as_str())
    }

    pub fn issue_type_name(&self) -> &str {
        self.issuetype.as_ref().map_or("Unknown", |t| t.name.as_str())
    }

    pub fn priority_name(&self) -> &str {
        self.priority.as_ref().map_or("None", |p| p.name.as_str())
    }

    /// Assignee display name, or "Unassigned"
    pub fn assignee_name(&self) -> &str {
        self.assignee
            .as_ref()
            .map_or("Unassigned", |u| u.display_name.as_str())
    }

    pub fn reporter_name(&self) -> &str {
        self.reporter
            .as_ref()
            .map_or("Unknown", |u| u.display_name.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub name: String,
    #[serde(default)]
    pub status_category: Option<NamedEntity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub display_name: String,
}

/// Anything JIRA identifies by a `name` (priority, issue type, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentIssue {
    pub key: String,
    #[serde(default)]
    pub fields: ParentFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub issuetype: Option<NamedEntity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVersion {
    pub name: String,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default)]
    pub outward_issue: Option<LinkedIssue>,
    #[serde(default)]
    pub inward_issue: Option<LinkedIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkType {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inward: String,
    #[serde(default)]
    pub outward: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedIssue {
    pub key: String,
    #[serde(default)]
    pub fields: LinkedIssueFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedIssueFields {
    #[serde(default)]
    pub summary: String,
}

/// The `comment` field
#[derive(Debug, Clone, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl CommentPage {
    /// Total number of comments on the issue, which may exceed the page
    pub fn total(&self) -> usize {
        self.total.unwrap_or(self.comments.len())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub body: Option<RichText>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Server information from `GET /rest/api/3/serverInfo`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub deployment_type: Option<String>,
    #[serde(default)]
    pub server_title: Option<String>,
}

/// A field value whose shape is not fixed by the JIRA schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum FieldValue {
    /// Missing or null
    Absent,

    /// String, number or boolean, already stringified
    Scalar(String),

    /// Option-like object (`{"value": ..}` or `{"name": ..}`)
    Named(String),

    /// Multi-select; elements keep their own classification
    List(Vec<FieldValue>),

    /// Any other object
    Unrecognized,
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::String(s) => FieldValue::Scalar(s),
            Value::Number(n) => FieldValue::Scalar(n.to_string()),
            Value::Bool(b) => FieldValue::Scalar(b.to_string()),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => {
                let named = ["value", "name"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(scalar_text));
                match named {
                    Some(name) => FieldValue::Named(name),
                    None => FieldValue::Unrecognized,
                }
            }
        }
    }
}

/// Display text of a string, number or boolean
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Long-form text: either plain text or an Atlassian document tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RichText {
    Plain(String),
    Document(DocNode),
}

/// One node of an Atlassian document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocNode {
    pub node_type: String,
    pub text: Option<String>,
    pub content: Vec<DocNode>,
}

impl From<Value> for RichText {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RichText::Plain(s),
            Value::Object(_) => RichText::Document(DocNode::from(&value)),
            Value::Null => RichText::Plain(String::new()),
            other => RichText::Plain(other.to_string()),
        }
    }
}

impl From<&Value> for DocNode {
    fn from(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return DocNode::default();
        };

        DocNode {
            node_type: map
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            text: map.get("text").and_then(Value::as_str).map(str::to_string),
            content: map
                .get("content")
                .and_then(Value::as_array)
                .map(|nodes| nodes.iter().map(DocNode::from).collect())
                .unwrap_or_default(),
        }
    }
}

/// JIRA sends `null` for some empty collections
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
