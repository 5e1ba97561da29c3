use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use httpbridge_dict::{Dictionary, Value};
use httpbridge_proto::keys;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    request: &'a str,
    size: usize,
    wire: String,
    tuples: Vec<TupleOutput<'a>>,
}

#[derive(Serialize)]
struct TupleOutput<'a> {
    key: u32,
    name: &'static str,
    #[serde(rename = "type")]
    tuple_type: &'static str,
    value: &'a Value,
}

fn tuple_rows(dict: &Dictionary) -> Vec<TupleOutput<'_>> {
    dict.iter()
        .map(|tuple| TupleOutput {
            key: tuple.key,
            name: keys::key_name(tuple.key),
            tuple_type: tuple.value.tuple_type().as_str(),
            value: &tuple.value,
        })
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Print an encoded request.
pub fn print_encoded(request: &str, dict: &Dictionary, wire: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                request,
                size: wire.len(),
                wire: hex::encode(wire),
                tuples: tuple_rows(dict),
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["KEY", "NAME", "TYPE", "VALUE"]);
            for row in tuple_rows(dict) {
                table.add_row(vec![
                    format!("{:#06x}", row.key),
                    row.name.to_string(),
                    row.tuple_type.to_string(),
                    row.value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("request={request} size={} tuples={}", wire.len(), dict.len());
            for row in tuple_rows(dict) {
                println!(
                    "  {:#06x} {} {}={}",
                    row.key, row.name, row.tuple_type, row.value
                );
            }
        }
        OutputFormat::Raw => println!("{}", hex::encode(wire)),
    }
}

/// One handler invocation observed while decoding.
#[derive(Debug, Clone)]
pub struct FiredCallback {
    pub callback: &'static str,
    pub args: Vec<(&'static str, String)>,
}

impl FiredCallback {
    pub fn new(callback: &'static str) -> Self {
        Self {
            callback,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, name: &'static str, value: impl ToString) -> Self {
        self.args.push((name, value.to_string()));
        self
    }

    fn args_line(&self) -> String {
        self.args
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Serialize)]
struct DispatchOutput<'a> {
    kind: Option<&'a str>,
    dropped: Option<String>,
    callbacks: Vec<CallbackOutput<'a>>,
}

#[derive(Serialize)]
struct CallbackOutput<'a> {
    callback: &'a str,
    args: serde_json::Map<String, serde_json::Value>,
}

/// Print the outcome of dispatching one dictionary.
pub fn print_dispatch(
    kind: Option<&str>,
    dropped: Option<String>,
    fired: &[FiredCallback],
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let callbacks = fired
                .iter()
                .map(|call| CallbackOutput {
                    callback: call.callback,
                    args: call
                        .args
                        .iter()
                        .map(|(name, value)| {
                            (name.to_string(), serde_json::Value::String(value.clone()))
                        })
                        .collect(),
                })
                .collect();
            let out = DispatchOutput {
                kind,
                dropped,
                callbacks,
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            if let Some(reason) = dropped {
                println!("dropped: {reason}");
                return;
            }
            let mut table = new_table(vec!["CALLBACK", "ARGS"]);
            for call in fired {
                table.add_row(vec![call.callback.to_string(), call.args_line()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            if let Some(reason) = dropped {
                println!("dropped: {reason}");
                return;
            }
            if let Some(kind) = kind {
                println!("kind={kind}");
            }
            for call in fired {
                println!("{} {}", call.callback, call.args_line());
            }
        }
    }
}

#[derive(Serialize)]
struct KeyOutput {
    name: &'static str,
    key: u32,
    hex: String,
    band: &'static str,
}

/// Print the reserved key table.
pub fn print_keys(format: OutputFormat) {
    let rows: Vec<KeyOutput> = keys::ALL
        .iter()
        .map(|&key| KeyOutput {
            name: keys::key_name(key),
            key,
            hex: format!("{key:#06x}"),
            band: keys::key_band(key),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", to_json(&rows)),
        OutputFormat::Table => {
            let mut table = new_table(vec!["NAME", "KEY", "BAND"]);
            for row in &rows {
                table.add_row(vec![row.name.to_string(), row.hex.clone(), row.band.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!("{:<14} {} {}", row.name, row.hex, row.band);
            }
        }
    }
}

/// Build and runtime details reported by `version --extended`.
#[derive(Serialize)]
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub target_os: &'static str,
    pub target_arch: &'static str,
    pub outbound_capacity: usize,
    pub inbound_capacity: usize,
    pub reserved_keys: String,
    pub reserved_key_count: usize,
}

impl VersionInfo {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.to_string()),
            ("version", self.version.to_string()),
            ("target", self.target.to_string()),
            ("profile", self.profile.to_string()),
            ("target_os", self.target_os.to_string()),
            ("target_arch", self.target_arch.to_string()),
            ("outbound_capacity", self.outbound_capacity.to_string()),
            ("inbound_capacity", self.inbound_capacity.to_string()),
            ("reserved_keys", self.reserved_keys.clone()),
            ("reserved_key_count", self.reserved_key_count.to_string()),
        ]
    }
}

pub fn print_version(info: &VersionInfo, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(info)),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (field, value) in info.rows() {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for (field, value) in info.rows() {
                println!("{field}: {value}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fired_callback_args_line() {
        let call = FiredCallback::new("failure")
            .arg("request_id", 0)
            .arg("status", 1008);
        assert_eq!(call.args_line(), "request_id=0 status=1008");
    }

    #[test]
    fn version_rows_follow_field_order() {
        let info = VersionInfo {
            name: "httpbridge",
            version: "1.2.3",
            target: "unknown",
            profile: "debug",
            target_os: "linux",
            target_arch: "x86_64",
            outbound_capacity: 256,
            inbound_capacity: 256,
            reserved_keys: "0xffe0..=0xffff".to_string(),
            reserved_key_count: 18,
        };
        let rows = info.rows();
        assert_eq!(rows[0], ("name", "httpbridge".to_string()));
        assert_eq!(rows[3], ("profile", "debug".to_string()));
        assert_eq!(rows[6], ("outbound_capacity", "256".to_string()));
        assert_eq!(rows.len(), 10);
    }
}
