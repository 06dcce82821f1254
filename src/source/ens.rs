//! ENS name directory: on-chain address to display name.

use crate::error::Result;
use crate::model::NameDirectory;
use crate::schema::EnsEntry;
use crate::source::http::get_json;

/// Fetch the directory and keep only entries that carry a `name`.
pub async fn fetch_name_directory(client: &reqwest::Client, url: &str) -> Result<NameDirectory> {
    let entries: Vec<EnsEntry> = get_json(client, url, "ENS directory").await?;
    Ok(build_name_directory(entries))
}

/// Entries without `name` are dropped. `idShort` is not a fallback.
pub fn build_name_directory(entries: impl IntoIterator<Item = EnsEntry>) -> NameDirectory {
    entries
        .into_iter()
        .filter_map(|e| e.name.map(|name| (e.id, name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entries_without_name_are_omitted() {
        let entries: Vec<EnsEntry> = serde_json::from_str(
            r#"[
                { "id": "0xaaa", "name": "alpha.eth", "idShort": "0xa…a" },
                { "id": "0xbbb", "idShort": "0xb…b" },
                { "id": "0xccc", "name": null, "idShort": "0xc…c" },
                { "id": "0xddd", "name": "delta.eth" }
            ]"#,
        )
        .unwrap();

        let dir = build_name_directory(entries);
        let expected: NameDirectory = [
            ("0xaaa".to_string(), "alpha.eth".to_string()),
            ("0xddd".to_string(), "delta.eth".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(dir, expected);
    }

    #[test]
    fn directory_must_be_an_array() {
        let res: std::result::Result<Vec<EnsEntry>, _> =
            serde_json::from_str(r#"{ "id": "0xaaa" }"#);
        assert!(res.is_err());
    }
}
