use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message shown once a boarding pass has been produced
pub const SUCCESS_MESSAGE: &str = "Boarding pass generated successfully!";

/// Required length of a PNR, in characters
pub const PNR_LENGTH: usize = 6;

/// Named colour tones used to build an airline accent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Blue,
    Indigo,
    Red,
    Orange,
    Yellow,
    Purple,
    Pink,
}

/// Two-tone gradient used to theme the form for an airline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accent {
    pub from: Tone,
    pub to: Tone,
}

impl Accent {
    pub const fn new(from: Tone, to: Tone) -> Self {
        Self { from, to }
    }
}

impl Default for Accent {
    fn default() -> Self {
        Accent::new(Tone::Blue, Tone::Indigo)
    }
}

/// Supported airlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Airline {
    Indigo,
    AirIndia,
    SpiceJet,
    Akasa,
}

impl Airline {
    pub const ALL: [Airline; 4] = [
        Airline::Indigo,
        Airline::AirIndia,
        Airline::SpiceJet,
        Airline::Akasa,
    ];

    /// Identifier stored in the form
    pub fn id(&self) -> &'static str {
        match self {
            Airline::Indigo => "indigo",
            Airline::AirIndia => "airindia",
            Airline::SpiceJet => "spicejet",
            Airline::Akasa => "akasa",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Airline::Indigo => "IndiGo",
            Airline::AirIndia => "Air India",
            Airline::SpiceJet => "SpiceJet",
            Airline::Akasa => "Akasa Air",
        }
    }

    pub fn accent(&self) -> Accent {
        match self {
            Airline::Indigo => Accent::new(Tone::Indigo, Tone::Blue),
            Airline::AirIndia => Accent::new(Tone::Red, Tone::Orange),
            Airline::SpiceJet => Accent::new(Tone::Red, Tone::Yellow),
            Airline::Akasa => Accent::new(Tone::Purple, Tone::Pink),
        }
    }

    /// IATA designator used for flight numbers and booking references
    pub fn code(&self) -> &'static str {
        match self {
            Airline::Indigo => "6E",
            Airline::AirIndia => "AI",
            Airline::SpiceJet => "SG",
            Airline::Akasa => "QP",
        }
    }

    /// Look up an airline by form identifier. Unknown and empty ids yield `None`.
    pub fn from_id(id: &str) -> Option<Airline> {
        Airline::ALL.into_iter().find(|airline| airline.id() == id)
    }

    pub fn info(&self) -> AirlineInfo {
        AirlineInfo {
            value: self.id().to_string(),
            label: self.label().to_string(),
            accent: self.accent(),
        }
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serializable airline reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub value: String,
    pub label: String,
    pub accent: Accent,
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Airline,
    Pnr,
    LastName,
}

impl FieldName {
    pub fn as_str(&self) -> &str {
        match self {
            FieldName::Airline => "airline",
            FieldName::Pnr => "pnr",
            FieldName::LastName => "lastName",
        }
    }
}

impl FromStr for FieldName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airline" => Ok(FieldName::Airline),
            "pnr" => Ok(FieldName::Pnr),
            "lastName" | "last_name" => Ok(FieldName::LastName),
            other => Err(anyhow::anyhow!("Unknown form field: {}", other)),
        }
    }
}

/// Current contents of the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub pnr: String,
    pub last_name: String,
    pub airline: String,
}

impl FormData {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Airline => &self.airline,
            FieldName::Pnr => &self.pnr,
            FieldName::LastName => &self.last_name,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.pnr.is_empty() && !self.last_name.is_empty() && !self.airline.is_empty()
    }

    pub fn to_request(&self) -> BoardingPassRequest {
        BoardingPassRequest {
            pnr: self.pnr.clone(),
            last_name: self.last_name.clone(),
            airline: self.airline.clone(),
        }
    }
}

/// Payload sent to a boarding pass backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPassRequest {
    pub pnr: String,
    pub last_name: String,
    pub airline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPass {
    pub passenger_name: String,
    pub flight_number: String,
    pub departure: String,
    pub arrival: String,
    pub date: NaiveDate,
    pub seat: String,
    pub gate: String,
    pub boarding_time: String,
    pub pnr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_reference: Option<String>,
}

/// Outcome of the most recent submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultState {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boarding_pass: Option<BoardingPass>,
}

impl ResultState {
    pub fn success(boarding_pass: BoardingPass) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            boarding_pass: Some(boarding_pass),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            boarding_pass: None,
        }
    }
}
