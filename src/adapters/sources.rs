use crate::domain::model::Employee;
use crate::domain::ports::{EmployeeSource, Storage};
use crate::utils::error::{GreetingError, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Roster source backed by a `name,birthdate` CSV file read through the
/// storage seam. Extra columns are ignored, column order does not matter.
pub struct CsvEmployeeSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> CsvEmployeeSource<S> {
    pub fn new(storage: S, path: String) -> Self {
        Self { storage, path }
    }
}

impl<S: Storage> EmployeeSource for CsvEmployeeSource<S> {
    async fn fetch(&self) -> Result<Vec<Employee>> {
        tracing::debug!("Reading roster file: {}", self.path);
        let data = self.storage.read_file(&self.path).await?;
        parse_roster(&data)
    }
}

/// Parses CSV roster bytes. The header row must contain `name` and
/// `birthdate` columns; dates use `YYYY-MM-DD`.
pub fn parse_roster(data: &[u8]) -> Result<Vec<Employee>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let name_column = column_index(&headers, "name")?;
    let birthdate_column = column_index(&headers, "birthdate")?;

    let mut roster = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1, the first data row line 2.
        let line = index + 2;

        let name = record.get(name_column).unwrap_or_default();
        if name.is_empty() {
            return Err(GreetingError::ProcessingError {
                message: format!("Roster line {}: employee name is empty", line),
            });
        }

        let raw_date = record.get(birthdate_column).unwrap_or_default();
        let birthdate = parse_birthdate(&format!("roster line {}", line), raw_date)?;

        roster.push(Employee::new(name, birthdate));
    }

    Ok(roster)
}

fn column_index(headers: &csv::StringRecord, wanted: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| GreetingError::ProcessingError {
            message: format!("Roster file has no '{}' column", wanted),
        })
}

fn parse_birthdate(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| GreetingError::InvalidDateError {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Roster source backed by an HTTP endpoint returning a JSON array of
/// `{"name": ..., "birthdate": "YYYY-MM-DD"}` objects. A single object is
/// treated as a roster of one.
pub struct HttpEmployeeSource {
    endpoint: String,
    client: Client,
    headers: Option<HashMap<String, String>>,
    parameters: Option<HashMap<String, String>>,
    timeout: Option<Duration>,
    field_mapping: Option<HashMap<String, String>>,
    max_employees: Option<usize>,
}

impl HttpEmployeeSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            headers: None,
            parameters: None,
            timeout: None,
            field_mapping: None,
            max_employees: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Maps foreign payload keys onto the expected ones, e.g.
    /// `{"full_name": "name"}` when the endpoint spells the name field
    /// differently.
    pub fn with_field_mapping(mut self, field_mapping: HashMap<String, String>) -> Self {
        self.field_mapping = Some(field_mapping);
        self
    }

    pub fn with_max_employees(mut self, max_employees: usize) -> Self {
        self.max_employees = Some(max_employees);
        self
    }

    fn employee_from_object(
        &self,
        object: serde_json::Map<String, serde_json::Value>,
        index: usize,
    ) -> Result<Employee> {
        let mut fields = HashMap::new();
        if let Some(mapping) = &self.field_mapping {
            for (original_key, value) in object {
                let mapped_key = mapping.get(&original_key).unwrap_or(&original_key);
                fields.insert(mapped_key.clone(), value);
            }
        } else {
            for (key, value) in object {
                fields.insert(key, value);
            }
        }

        let name = fields
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GreetingError::ProcessingError {
                message: format!("Roster entry {}: missing 'name' field", index + 1),
            })?
            .to_string();

        let raw_date = fields
            .get("birthdate")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GreetingError::ProcessingError {
                message: format!("Roster entry {}: missing 'birthdate' field", index + 1),
            })?;
        let birthdate = parse_birthdate(&format!("roster entry {}", index + 1), raw_date)?;

        Ok(Employee { name, birthdate })
    }
}

impl EmployeeSource for HttpEmployeeSource {
    async fn fetch(&self) -> Result<Vec<Employee>> {
        let mut request = self.client.get(&self.endpoint);

        if let Some(headers) = &self.headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        if let Some(parameters) = &self.parameters {
            for (key, value) in parameters {
                request = request.query(&[(key, value)]);
            }
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Requesting roster from: {}", self.endpoint);
        let response = request.send().await?.error_for_status()?;
        let payload: serde_json::Value = response.json().await?;

        let mut roster = Vec::new();
        match payload {
            serde_json::Value::Array(items) => {
                let cap = self.max_employees.unwrap_or(items.len());
                for (index, item) in items.into_iter().take(cap).enumerate() {
                    match item {
                        serde_json::Value::Object(object) => {
                            roster.push(self.employee_from_object(object, index)?);
                        }
                        other => {
                            return Err(GreetingError::ProcessingError {
                                message: format!(
                                    "Roster entry {}: expected an object, got {}",
                                    index + 1,
                                    other
                                ),
                            });
                        }
                    }
                }
            }
            serde_json::Value::Object(object) => {
                roster.push(self.employee_from_object(object, 0)?);
            }
            other => {
                return Err(GreetingError::ProcessingError {
                    message: format!("Roster payload is not a JSON array or object: {}", other),
                });
            }
        }

        tracing::debug!("Roster endpoint returned {} employee(s)", roster.len());
        Ok(roster)
    }
}

/// Fixed in-memory roster, the trivially fake-able source used by tests and
/// embedders that already hold their employees.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeSource {
    roster: Vec<Employee>,
}

impl InMemoryEmployeeSource {
    pub fn new(roster: Vec<Employee>) -> Self {
        Self { roster }
    }
}

impl EmployeeSource for InMemoryEmployeeSource {
    async fn fetch(&self) -> Result<Vec<Employee>> {
        Ok(self.roster.clone())
    }
}
