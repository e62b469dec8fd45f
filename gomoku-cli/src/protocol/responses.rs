//! Wire protocol responses (spec.md §6). Grounded on
//! `original_source/src/communication/protocol/responses.py`'s response
//! hierarchy, collapsed into one enum since Rust doesn't need a class per
//! response kind to vary `to_output`.

/// Identity fields returned by `ABOUT` (spec.md §6's grammar, filled out
/// per SPEC_FULL.md §11's supplemented identity fields).
#[derive(Debug, Clone)]
pub struct AboutInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    pub country: Option<String>,
    pub www: Option<String>,
    pub email: Option<String>,
}

impl AboutInfo {
    fn to_line(&self) -> String {
        let mut parts = vec![
            format!("name=\"{}\"", self.name),
            format!("version=\"{}\"", self.version),
            format!("author=\"{}\"", self.author),
        ];
        if let Some(country) = &self.country {
            parts.push(format!("country=\"{country}\""));
        }
        if let Some(www) = &self.www {
            parts.push(format!("www=\"{www}\""));
        }
        if let Some(email) = &self.email {
            parts.push(format!("email=\"{email}\""));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone)]
pub enum Response {
    Ok,
    Error(String),
    Move(u16, u16),
    About(AboutInfo),
}

impl Response {
    pub fn to_line(&self) -> String {
        match self {
            Response::Ok => "OK".to_string(),
            Response::Error(detail) => format!("ERROR {detail}"),
            Response::Move(x, y) => format!("{x},{y}"),
            Response::About(info) => info.to_line(),
        }
    }
}
