//! `Movie` record and the mapping from `movieInfo` JSON.

use serde::Serialize;
use serde_json::Value;

use super::error::{KoficError, Result};

/// Number of actors, directors and nations kept in a flattened field.
const NAMED_LIST_LIMIT: usize = 5;

/// Flat movie record built from one `searchMovieInfo` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// KOFIC movie code.
    pub movie_code: String,
    /// Korean title (`movieNm`).
    pub name: String,
    /// English title (`movieNmEn`).
    pub name_en: String,
    /// First five actor names, comma-joined.
    pub actor: String,
    /// First five director names, comma-joined.
    pub director: String,
    /// All genre names, comma-joined.
    pub genre: String,
    /// First five production nations, comma-joined.
    pub nation: String,
    /// All watch grades, comma-joined.
    pub rating: String,
    /// Opening date as served (`openDt`, e.g. `"20120913"`).
    pub open_date: String,
    /// Running time in minutes (`showTm`).
    pub show_time: u32,
    /// Movie type (`typeNm`).
    #[serde(rename = "type")]
    pub movie_type: String,
    /// Production status (`prdtStatNm`).
    pub status: String,
    /// Production year (`prdtYear`).
    pub production_year: String,
    /// Copied from `movieNmEn`, not from `companys`.
    pub company: String,
}

impl Movie {
    /// Builds a `Movie` from a `movieInfo` object.
    ///
    /// # Errors
    ///
    /// Returns `KoficError::Parse` naming the first missing or malformed field.
    pub fn from_movie_info(movie_code: impl Into<String>, info: &Value) -> Result<Self> {
        let name_en = required_str(info, "movieNmEn")?;

        Ok(Self {
            movie_code: movie_code.into(),
            name: required_str(info, "movieNm")?,
            actor: flatten_field(info, "actors", "peopleNm", Some(NAMED_LIST_LIMIT))?,
            director: flatten_field(info, "directors", "peopleNm", Some(NAMED_LIST_LIMIT))?,
            genre: flatten_field(info, "genres", "genreNm", None)?,
            nation: flatten_field(info, "nations", "nationNm", Some(NAMED_LIST_LIMIT))?,
            rating: flatten_field(info, "audits", "watchGradeNm", None)?,
            open_date: required_str(info, "openDt")?,
            show_time: show_time(info)?,
            movie_type: required_str(info, "typeNm")?,
            status: required_str(info, "prdtStatNm")?,
            production_year: required_str(info, "prdtYear")?,
            // TODO: take this from `companys[].companyNm` once the company role
            // (production or distribution) is decided.
            company: name_en.clone(),
            name_en,
        })
    }
}

/// Joins `name_key` of each element of `list` with `,`, keeping at most
/// `limit` elements (`None` keeps all). An empty array yields `""`.
///
/// # Errors
///
/// Returns `KoficError::Parse` if `list` is not an array or a kept element
/// has no string `name_key`.
pub fn flatten_named_list(list: &Value, name_key: &str, limit: Option<usize>) -> Result<String> {
    let entries = list.as_array().ok_or_else(|| {
        KoficError::Parse(format!("expected an array of objects with `{name_key}`"))
    })?;

    let names = entries
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get(name_key)
                .and_then(Value::as_str)
                .ok_or_else(|| KoficError::missing_field(&format!("[{i}].{name_key}")))
        })
        .collect::<Result<Vec<&str>>>()?;

    Ok(names.join(","))
}

fn field<'a>(info: &'a Value, key: &str) -> Result<&'a Value> {
    info.get(key)
        .ok_or_else(|| KoficError::missing_field(&format!("movieInfo.{key}")))
}

fn required_str(info: &Value, key: &str) -> Result<String> {
    field(info, key)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| KoficError::Parse(format!("`movieInfo.{key}` is not a string")))
}

fn flatten_field(
    info: &Value,
    key: &str,
    name_key: &str,
    limit: Option<usize>,
) -> Result<String> {
    flatten_named_list(field(info, key)?, name_key, limit).map_err(|e| match e {
        KoficError::Parse(msg) => KoficError::Parse(format!("movieInfo.{key}: {msg}")),
        other => other,
    })
}

/// `showTm` is served as a digit string; blank means unknown and maps to 0.
fn show_time(info: &Value) -> Result<u32> {
    let raw = field(info, "showTm")?;
    let parsed = match raw {
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    parsed.ok_or_else(|| KoficError::Parse(format!("`movieInfo.showTm` is not a number: {raw}")))
}
