use serde::Deserialize;

/// One entry of the ENS directory response.
///
/// JSON shape: `{ "id": "0xabc...", "name": "foo.eth", "idShort": "0xab…cd" }`
#[derive(Debug, Clone, Deserialize)]
pub struct EnsEntry {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    // Parsed for completeness; the directory never falls back to it.
    #[serde(default, rename = "idShort")]
    #[allow(unused)]
    pub id_short: Option<String>,
}
