//! Neo4j graph store
//!
//! Talks to Neo4j through its HTTP transactional endpoint
//! (`POST {url}/db/{database}/tx/commit`). Each trait call commits one
//! transaction holding one or two read statements. No retries: a failed
//! call is reported to the caller, which must treat it as "unable to verify".
//!
//! Schema expectations:
//! - patient subgraph nodes carry a `gid` property
//! - condition nodes are labelled `Disease` or `Condition`
//! - drug nodes are labelled `Drug` or `Medication`
//! - nodes are named by `id` and optionally `name`
//! - cross-subgraph links use `REFERENCE` relationships

use crate::GraphError;
use medrag_domain::traits::GraphStore;
use medrag_domain::{ContextTriple, RuleQuery, RuleRecord};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Neo4j HTTP endpoint
pub const DEFAULT_URL: &str = "http://localhost:7474";

/// Default database name
pub const DEFAULT_DATABASE: &str = "neo4j";

/// Default request timeout (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const PATIENT_EXISTS_QUERY: &str = "
MATCH (n) WHERE n.gid = $gid
RETURN count(n) AS nodes";

const PATIENT_CONDITIONS_QUERY: &str = "
MATCH (n)
WHERE n.gid = $gid AND NOT n:Summary
  AND (n:Disease OR n:Condition)
RETURN DISTINCT coalesce(n.name, n.id) AS condition";

const CONTRAINDICATIONS_QUERY: &str = "
MATCH (d)-[r]->(c)
WHERE (d:Drug OR d:Medication)
  AND (c:Disease OR c:Condition)
  AND type(r) IN $relations
  AND (toLower(d.id) IN $drug_names OR toLower(d.name) IN $drug_names)
  AND (toLower(c.id) IN $condition_names OR toLower(c.name) IN $condition_names)
RETURN
  CASE WHEN toLower(d.name) IN $drug_names THEN d.name ELSE d.id END AS drug,
  type(r) AS relation,
  CASE WHEN toLower(c.name) IN $condition_names THEN c.name ELSE c.id END AS condition,
  r.reason AS reason";

const SUBGRAPH_QUERY: &str = "
MATCH (n)
WHERE n.gid = $gid AND NOT n:Summary
WITH collect(n) AS nodes
UNWIND nodes AS n
UNWIND nodes AS m
MATCH (n)-[r]-(m)
WHERE id(n) < id(m)
RETURN n.id AS source, type(r) AS relation, m.id AS target
LIMIT $limit";

const LINKED_QUERY: &str = "
MATCH (n)
WHERE n.gid = $gid AND NOT n:Summary
MATCH (n)-[:REFERENCE]->(m)
WHERE NOT m:Summary
MATCH (m)-[s]-(o)
WHERE NOT o:Summary AND type(s) <> 'REFERENCE'
RETURN n.id AS source, m.id AS reference, type(s) AS relation, o.id AS target
LIMIT $limit";

/// Connection settings for [`Neo4jStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// HTTP endpoint (`http://` or `https://`)
    pub url: String,

    /// Database name
    pub database: String,

    /// Basic-auth user
    pub username: String,

    /// Basic-auth password
    pub password: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            username: "neo4j".to_string(),
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Neo4jConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Transaction commit endpoint
    pub fn commit_url(&self) -> String {
        format!("{}/db/{}/tx/commit", self.url.trim_end_matches('/'), self.database)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GraphError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(GraphError::Config(format!(
                "url must be an http(s) endpoint, got '{}' (bolt URLs are not supported)",
                self.url
            )));
        }
        if self.database.trim().is_empty() {
            return Err(GraphError::Config("database must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(GraphError::Config("timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Neo4j-backed [`GraphStore`]
pub struct Neo4jStore {
    config: Neo4jConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TxRequest<'a> {
    statements: Vec<TxStatement<'a>>,
}

#[derive(Serialize)]
struct TxStatement<'a> {
    statement: &'a str,
    parameters: Value,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Rows of one statement, with named columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl StatementResult {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the statement returned no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Result<usize, GraphError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| GraphError::InvalidResponse(format!("missing column '{}'", name)))
    }

    /// Values of a column as optional strings; null becomes `None`
    pub fn strings(&self, name: &str) -> Result<Vec<Option<String>>, GraphError> {
        let index = self.column(name)?;
        self.rows
            .iter()
            .map(|row| {
                row.get(index)
                    .map(value_to_string)
                    .ok_or_else(|| GraphError::InvalidResponse(format!("short row for '{}'", name)))
            })
            .collect()
    }

    /// First value of a column as an integer
    pub fn first_count(&self, name: &str) -> Result<u64, GraphError> {
        let index = self.column(name)?;
        self.rows
            .first()
            .and_then(|row| row.get(index))
            .and_then(Value::as_u64)
            .ok_or_else(|| GraphError::InvalidResponse(format!("'{}' is not a count", name)))
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a transactional endpoint response body
///
/// # Errors
///
/// [`GraphError::Query`] when the server reported statement errors,
/// [`GraphError::InvalidResponse`] when the body is not a commit response.
pub fn parse_response(body: &str) -> Result<Vec<StatementResult>, GraphError> {
    let response: TxResponse = serde_json::from_str(body)
        .map_err(|e| GraphError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = response.errors.first() {
        return Err(GraphError::Query(format!("{}: {}", error.code, error.message)));
    }

    Ok(response
        .results
        .into_iter()
        .map(|result| StatementResult {
            columns: result.columns,
            rows: result.data.into_iter().map(|d| d.row).collect(),
        })
        .collect())
}

fn conditions_from(exists: &StatementResult, names: &StatementResult) -> Result<Option<Vec<String>>, GraphError> {
    if exists.first_count("nodes")? == 0 {
        return Ok(None);
    }
    let mut seen = BTreeSet::new();
    let conditions = names
        .strings("condition")?
        .into_iter()
        .flatten()
        .filter(|name| seen.insert(name.clone()))
        .collect();
    Ok(Some(conditions))
}

fn rules_from(result: &StatementResult) -> Result<Vec<RuleRecord>, GraphError> {
    let drugs = result.strings("drug")?;
    let relations = result.strings("relation")?;
    let conditions = result.strings("condition")?;
    let reasons = result.strings("reason")?;

    let mut records = Vec::with_capacity(result.len());
    for (((drug, relation), condition), reason) in
        drugs.into_iter().zip(relations).zip(conditions).zip(reasons)
    {
        match (drug, relation, condition) {
            (Some(drug), Some(relation), Some(condition)) => {
                records.push(RuleRecord::new(drug, relation, condition, reason));
            }
            _ => warn!("Skipping contraindication row with missing fields"),
        }
    }
    Ok(records)
}

fn triples_from(
    local: &StatementResult,
    linked: &StatementResult,
    limit: usize,
) -> Result<Vec<ContextTriple>, GraphError> {
    let unknown = || "Unknown".to_string();
    let mut triples: Vec<ContextTriple> = local
        .strings("source")?
        .into_iter()
        .zip(local.strings("relation")?)
        .zip(local.strings("target")?)
        .map(|((s, r), t)| {
            ContextTriple::new(
                s.unwrap_or_else(unknown),
                r.unwrap_or_else(|| "RELATED_TO".to_string()),
                t.unwrap_or_else(unknown),
            )
        })
        .collect();

    let mut references = BTreeSet::new();
    let rows = linked
        .strings("source")?
        .into_iter()
        .zip(linked.strings("reference")?)
        .zip(linked.strings("relation")?)
        .zip(linked.strings("target")?);
    for (((source, reference), relation), target) in rows {
        let source = source.unwrap_or_else(unknown);
        let reference = reference.unwrap_or_else(unknown);
        if references.insert((source.clone(), reference.clone())) {
            triples.push(ContextTriple::new(source, "REFERENCE", reference.clone()));
        }
        triples.push(ContextTriple::new(
            reference,
            relation.unwrap_or_else(|| "RELATED_TO".to_string()),
            target.unwrap_or_else(unknown),
        ));
    }

    triples.truncate(limit);
    Ok(triples)
}

impl Neo4jStore {
    /// Create a new store
    ///
    /// # Errors
    ///
    /// [`GraphError::Config`] when the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: Neo4jConfig) -> Result<Self, GraphError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Store configuration
    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    async fn run(&self, statements: Vec<TxStatement<'_>>) -> Result<Vec<StatementResult>, GraphError> {
        let expected = statements.len();
        let mut request = self
            .client
            .post(self.config.commit_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&TxRequest { statements });
        if let Some(password) = &self.config.password {
            request = request.basic_auth(&self.config.username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GraphError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::Http(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(GraphError::Http(format!("HTTP {}: {}", status, body)));
        }

        let results = parse_response(&body)?;
        if results.len() != expected {
            return Err(GraphError::InvalidResponse(format!(
                "expected {} statement results, got {}",
                expected,
                results.len()
            )));
        }
        Ok(results)
    }
}

impl GraphStore for Neo4jStore {
    type Error = GraphError;

    async fn patient_conditions(&self, patient_id: &str) -> Result<Option<Vec<String>>, GraphError> {
        let params = json!({ "gid": patient_id });
        let results = self
            .run(vec![
                TxStatement { statement: PATIENT_EXISTS_QUERY, parameters: params.clone() },
                TxStatement { statement: PATIENT_CONDITIONS_QUERY, parameters: params },
            ])
            .await?;

        let conditions = conditions_from(&results[0], &results[1])?;
        debug!(
            "Patient '{}' has {} condition node(s)",
            patient_id,
            conditions.as_ref().map_or(0, Vec::len)
        );
        Ok(conditions)
    }

    async fn contraindications(&self, query: &RuleQuery) -> Result<Vec<RuleRecord>, GraphError> {
        let params = json!({
            "drug_names": query.drug_names,
            "condition_names": query.condition_names,
            "relations": query.relations,
        });
        let results = self
            .run(vec![TxStatement { statement: CONTRAINDICATIONS_QUERY, parameters: params }])
            .await?;

        let records = rules_from(&results[0])?;
        debug!("Contraindication query returned {} row(s)", records.len());
        Ok(records)
    }

    async fn subgraph_context(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<ContextTriple>, GraphError> {
        let params = json!({ "gid": patient_id, "limit": limit });
        let results = self
            .run(vec![
                TxStatement { statement: SUBGRAPH_QUERY, parameters: params.clone() },
                TxStatement { statement: LINKED_QUERY, parameters: params },
            ])
            .await?;

        triples_from(&results[0], &results[1], limit)
    }
}
