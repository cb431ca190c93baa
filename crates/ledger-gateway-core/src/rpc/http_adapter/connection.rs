use reqwest::Url;

use crate::error::GatewayError;

pub(super) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
) -> Result<Option<(String, String)>, GatewayError> {
    match (user, pass) {
        (Some(u), Some(p)) => Ok(Some((u.to_owned(), p.to_owned()))),
        (Some(_), None) | (None, Some(_)) => Err(GatewayError::MalformedInput(
            "both rpc user and rpc pass must be set together".to_owned(),
        )),
        (None, None) => Ok(None),
    }
}

pub(super) fn parse_connection(connection: &str) -> Result<String, GatewayError> {
    let parsed = Url::parse(connection).map_err(|e| {
        GatewayError::MalformedInput(format!(
            "invalid connection `{connection}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(connection.to_owned()),
        other => Err(GatewayError::MalformedInput(format!(
            "unsupported connection scheme `{other}`; expected http or https"
        ))),
    }
}
