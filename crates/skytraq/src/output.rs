use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use skytraq_message::{Field, InputMessage};
use skytraq_receiver::{DetectedBaudRate, Message};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FieldOutput {
    name: &'static str,
    value: i64,
    display: String,
}

impl From<&Field> for FieldOutput {
    fn from(field: &Field) -> Self {
        Self {
            name: field.name(),
            value: field.value(),
            display: field.to_string(),
        }
    }
}

#[derive(Serialize)]
struct MessageOutput {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    fields: Vec<FieldOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
    text: String,
}

impl From<&Message> for MessageOutput {
    fn from(message: &Message) -> Self {
        let text = message.to_string();
        match message {
            Message::Nmea(_) => Self {
                kind: "nmea",
                id: None,
                name: None,
                fields: Vec::new(),
                payload: None,
                text,
            },
            Message::Output(msg) => Self {
                kind: "output",
                id: Some(msg.id()),
                name: Some(msg.name()),
                fields: msg.fields().iter().map(FieldOutput::from).collect(),
                payload: Some(hex::encode(msg.payload())),
                text,
            },
            Message::Frame(frame) => Self {
                kind: "frame",
                id: frame.message_id(),
                name: None,
                fields: Vec::new(),
                payload: Some(hex::encode(&frame.payload)),
                text,
            },
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    id: u8,
    name: &'static str,
    fields: Vec<FieldOutput>,
    hex: &'a str,
}

#[derive(Serialize)]
struct DetectedOutput {
    index: usize,
    rate: u32,
    code: Option<u8>,
}

#[derive(Serialize)]
pub struct CommandOutput {
    pub id: u8,
    pub name: &'static str,
    pub acknowledged: bool,
    pub position: usize,
}

#[derive(Serialize)]
pub struct QueryOutput {
    pub id: u8,
    pub name: &'static str,
    pub status: String,
    pub responses: Vec<String>,
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn print_message(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&MessageOutput::from(message)),
        OutputFormat::Table => {
            let out = MessageOutput::from(message);
            let mut table = new_table(vec!["KIND", "ID", "NAME", "FIELD", "VALUE"]);
            let id = out.id.map(|id| format!("0x{id:02x}")).unwrap_or_default();
            let name = out.name.unwrap_or_default();
            if out.fields.is_empty() {
                let summary = out.payload.clone().unwrap_or_else(|| out.text.clone());
                table.add_row(vec![out.kind, id.as_str(), name, "", summary.as_str()]);
            }
            for field in &out.fields {
                table.add_row(vec![
                    out.kind,
                    id.as_str(),
                    name,
                    field.name,
                    field.display.as_str(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{message}"),
    }
}

pub fn print_encoded(message: &InputMessage, wire: &[u8], format: OutputFormat) {
    let hex = hex::encode(wire);
    match format {
        OutputFormat::Json => print_json(&EncodedOutput {
            id: message.id(),
            name: message.name(),
            fields: message.fields().iter().map(FieldOutput::from).collect(),
            hex: &hex,
        }),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE", "RAW"]);
            table.add_row(vec![
                "Message".to_string(),
                message.name().to_string(),
                format!("0x{:02x}", message.id()),
            ]);
            for field in message.fields() {
                table.add_row(vec![
                    field.name().to_string(),
                    field.to_string(),
                    hex::encode(field.to_bytes()),
                ]);
            }
            table.add_row(vec!["Frame".to_string(), String::new(), hex.clone()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{message}");
            println!("{hex}");
        }
    }
}

pub fn print_detected(detected: DetectedBaudRate, format: OutputFormat) {
    let out = DetectedOutput {
        index: detected.index,
        rate: detected.rate,
        code: detected.code(),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["INDEX", "RATE", "CODE"]);
            table.add_row(vec![
                out.index.to_string(),
                out.rate.to_string(),
                out.code.map(|c| c.to_string()).unwrap_or_default(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("Receiver talks at {} bps", out.rate),
    }
}

pub fn print_command(out: &CommandOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ID", "MESSAGE", "ACK", "POSITION"]);
            table.add_row(vec![
                format!("0x{:02x}", out.id),
                out.name.to_string(),
                out.acknowledged.to_string(),
                out.position.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!(
            "GPS acknowledges '{}' (0x{:02x}) after {} messages",
            out.name, out.id, out.position
        ),
    }
}

pub fn print_queries(results: &[QueryOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Table => {
            let mut table = new_table(vec!["ID", "QUERY", "STATUS", "RESPONSE"]);
            for result in results {
                table.add_row(vec![
                    format!("0x{:02x}", result.id),
                    result.name.to_string(),
                    result.status.clone(),
                    result.responses.join("\n"),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for result in results {
                println!("{} (0x{:02x}): {}", result.name, result.id, result.status);
                for response in &result.responses {
                    println!("{response}");
                }
            }
        }
    }
}
