//! Payload builders for the common content kinds.
//!
//! The strings produced here are what ends up encoded in the symbol; the
//! renderer treats them as opaque. The content kind also matters to
//! rendering in one place: dense kinds raise the error correction floor.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What a payload represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Url,
    Text,
    Email,
    Phone,
    Sms,
    Wifi,
    VCard,
    Location,
    WhatsApp,
    Upi,
    Pdf,
}

impl ContentKind {
    pub const ALL: [ContentKind; 11] = [
        ContentKind::Url,
        ContentKind::Text,
        ContentKind::Email,
        ContentKind::Phone,
        ContentKind::Sms,
        ContentKind::Wifi,
        ContentKind::VCard,
        ContentKind::Location,
        ContentKind::WhatsApp,
        ContentKind::Upi,
        ContentKind::Pdf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Url => "url",
            ContentKind::Text => "text",
            ContentKind::Email => "email",
            ContentKind::Phone => "phone",
            ContentKind::Sms => "sms",
            ContentKind::Wifi => "wifi",
            ContentKind::VCard => "vcard",
            ContentKind::Location => "location",
            ContentKind::WhatsApp => "whatsapp",
            ContentKind::Upi => "upi",
            ContentKind::Pdf => "pdf",
        }
    }

    /// Kinds whose payloads are long and structured enough to need extra
    /// redundancy regardless of logo size.
    pub fn is_dense(self) -> bool {
        matches!(self, ContentKind::Wifi | ContentKind::VCard)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "content kind",
                value: s.to_string(),
            })
    }
}

/// Percent-encodes everything outside the URI unreserved set.
pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out += &format!("%{:02X}", byte),
        }
    }
    out
}

/// Escapes the characters that are structural in `WIFI:` payloads.
fn escape_wifi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes vCard text values.
fn escape_vcard(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WifiSecurity {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
    pub security: WifiSecurity,
    pub hidden: bool,
}

impl WifiCredentials {
    pub fn to_payload(&self) -> String {
        let security = match self.security {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::Open => "nopass",
        };
        let mut payload = format!("WIFI:T:{};S:{};", security, escape_wifi(&self.ssid));
        if self.security != WifiSecurity::Open {
            payload += &format!("P:{};", escape_wifi(&self.password));
        }
        if self.hidden {
            payload += "H:true;";
        }
        payload += ";";
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VCard {
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub mobile: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

impl VCard {
    /// vCard 3.0. Empty fields are omitted.
    pub fn to_payload(&self) -> String {
        let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];
        lines.push(format!(
            "N:{};{};;;",
            escape_vcard(&self.last_name),
            escape_vcard(&self.first_name)
        ));
        let full_name = format!("{} {}", self.first_name, self.last_name);
        lines.push(format!("FN:{}", escape_vcard(full_name.trim())));
        let optional = [
            ("ORG", &self.organization),
            ("TITLE", &self.title),
            ("TEL;TYPE=WORK,VOICE", &self.phone),
            ("TEL;TYPE=CELL", &self.mobile),
            ("EMAIL", &self.email),
            ("URL", &self.website),
        ];
        for (key, value) in optional {
            if !value.is_empty() {
                lines.push(format!("{}:{}", key, escape_vcard(value)));
            }
        }
        if !self.address.is_empty() {
            lines.push(format!("ADR;TYPE=WORK:;;{};;;;", escape_vcard(&self.address)));
        }
        lines.push("END:VCARD".to_string());
        lines.join("\n")
    }
}

/// `mailto:` link with optional subject and body.
pub fn email(to: &str, subject: &str, body: &str) -> String {
    let mut query = Vec::new();
    if !subject.is_empty() {
        query.push(format!("subject={}", percent_encode(subject)));
    }
    if !body.is_empty() {
        query.push(format!("body={}", percent_encode(body)));
    }
    if query.is_empty() {
        format!("mailto:{}", to)
    } else {
        format!("mailto:{}?{}", to, query.join("&"))
    }
}

pub fn phone(number: &str) -> String {
    format!("tel:{}", number.trim())
}

pub fn sms(number: &str, message: &str) -> String {
    format!("SMSTO:{}:{}", number.trim(), message)
}

/// `geo:` URI for a coordinate pair.
pub fn location(latitude: f64, longitude: f64) -> String {
    format!("geo:{},{}", latitude, longitude)
}

/// Maps search link for a free-form place query.
pub fn location_search(query: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        percent_encode(query)
    )
}

/// Click-to-chat link. Everything but digits is dropped from the number.
pub fn whatsapp(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{}?text={}", digits, percent_encode(message))
}

/// UPI payment intent. The amount is omitted when empty.
pub fn upi(payee_address: &str, payee_name: &str, amount: &str) -> String {
    let mut payload = format!(
        "upi://pay?pa={}&pn={}",
        percent_encode(payee_address.trim()),
        percent_encode(payee_name.trim())
    );
    if !amount.trim().is_empty() {
        payload += &format!("&am={}&cu=INR", percent_encode(amount.trim()));
    }
    payload
}
