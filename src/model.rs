//! Data models for Ephany catalog entities.
//!
//! All entities are created by deserializing a single HTTP response and are
//! plain values from the caller's point of view. Derived properties such as
//! [`Asset::has_revit_family`] are computed from the file list on every call.

use crate::format::{
    truncate, CsvRecordProducer, FormattingError, OutputFormat, OutputFormatter, TableColumn,
    TableRecordProducer,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use strum::EnumIter;

/// Treats an explicit JSON `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Number(f64),
    Text(String),
}

/// Decimal fields arrive either as JSON numbers or as numeric strings.
fn decimal_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<DecimalRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(DecimalRepr::Number(value)) => Ok(Some(value)),
        Some(DecimalRepr::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid decimal value {:?}", text)))
        }
    }
}

/// Timestamps are RFC 3339. Values without an offset are read as UTC.
fn lenient_utc_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<String>::deserialize(deserializer)? {
        Some(text) => text,
        None => return Ok(None),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp {:?}", text)))
}

/// Category of a file attached to an asset.
///
/// The service sends a short code (`PDS`, `DWG`, `RFA`, `ETC`). Unknown codes
/// decode to [`AssetFileCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(from = "String", into = "String")]
pub enum AssetFileCategory {
    /// Product data sheet (PDF)
    CutSheet,
    /// 2D CAD drawing
    CadFile,
    /// Revit family (RFA)
    RevitFamily,
    /// Anything else
    Other,
}

impl AssetFileCategory {
    /// The short code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            AssetFileCategory::CutSheet => "PDS",
            AssetFileCategory::CadFile => "DWG",
            AssetFileCategory::RevitFamily => "RFA",
            AssetFileCategory::Other => "ETC",
        }
    }

    pub fn from_code(code: &str) -> AssetFileCategory {
        match code.trim().to_ascii_uppercase().as_str() {
            "PDS" => AssetFileCategory::CutSheet,
            "DWG" => AssetFileCategory::CadFile,
            "RFA" => AssetFileCategory::RevitFamily,
            _ => AssetFileCategory::Other,
        }
    }
}

impl From<String> for AssetFileCategory {
    fn from(code: String) -> Self {
        AssetFileCategory::from_code(&code)
    }
}

impl From<AssetFileCategory> for String {
    fn from(category: AssetFileCategory) -> Self {
        category.code().to_string()
    }
}

impl std::fmt::Display for AssetFileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A file attached to an asset (cut sheet, CAD drawing, Revit family...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFile {
    pub id: i64,
    /// Absolute URL of the file on the media server
    #[serde(rename = "file", default)]
    pub url: Option<String>,
    pub category: AssetFileCategory,
    #[serde(rename = "category_display", default)]
    pub category_display: Option<String>,
    #[serde(
        rename = "uploaded_at",
        default,
        deserialize_with = "lenient_utc_timestamp"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// The company producing an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "logo", default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A product entry in the Ephany catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    /// External identifier or SKU (e.g. "AVN-1")
    #[serde(rename = "type_id", default, deserialize_with = "null_as_default")]
    pub type_id: String,
    #[serde(default)]
    pub manufacturer: Option<Manufacturer>,
    #[serde(rename = "manufacturer_name", default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(rename = "category_name", default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "catalog_img", default)]
    pub catalog_img: Option<String>,
    #[serde(
        rename = "overall_height",
        default,
        deserialize_with = "decimal_from_number_or_string"
    )]
    pub overall_height: Option<f64>,
    #[serde(
        rename = "overall_width",
        default,
        deserialize_with = "decimal_from_number_or_string"
    )]
    pub overall_width: Option<f64>,
    #[serde(
        rename = "overall_depth",
        default,
        deserialize_with = "decimal_from_number_or_string"
    )]
    pub overall_depth: Option<f64>,
    /// Asset-type specific attributes (e.g. "door_type", "sku")
    #[serde(rename = "custom_fields", default, deserialize_with = "null_as_default")]
    pub custom_fields: HashMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<AssetFile>,
    /// Units for the numeric properties, e.g. "length" -> "mm"
    #[serde(rename = "_display_units", default, deserialize_with = "null_as_default")]
    pub display_units: HashMap<String, String>,
}

impl Asset {
    /// First attached file categorized as a Revit family, if any.
    pub fn revit_family_file(&self) -> Option<&AssetFile> {
        self.first_file_of(AssetFileCategory::RevitFamily)
    }

    /// First attached cut sheet, if any.
    pub fn cut_sheet_file(&self) -> Option<&AssetFile> {
        self.first_file_of(AssetFileCategory::CutSheet)
    }

    pub fn has_revit_family(&self) -> bool {
        self.revit_family_file().is_some()
    }

    pub fn first_file_of(&self, category: AssetFileCategory) -> Option<&AssetFile> {
        self.files.iter().find(|f| f.category == category)
    }

    /// Unit label for length dimensions as reported by the service.
    pub fn length_unit(&self) -> Option<&str> {
        self.display_units.get("length").map(String::as_str)
    }

    pub fn custom_field(&self, key: &str) -> Option<&serde_json::Value> {
        self.custom_fields.get(key)
    }
}

/// One page of a paginated collection.
///
/// `page_number` and `page_size` are stamped by the client with the requested
/// values and are never read from the response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct PagedResult<T> {
    /// Total number of items across all pages
    #[serde(rename = "count", default)]
    pub total_count: u64,
    #[serde(rename = "results", default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    #[serde(rename = "next", default)]
    pub next_page_url: Option<String>,
    #[serde(rename = "previous", default)]
    pub previous_page_url: Option<String>,
    #[serde(skip)]
    pub page_number: u32,
    #[serde(skip)]
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn empty(page_number: u32, page_size: u32) -> PagedResult<T> {
        PagedResult {
            total_count: 0,
            items: Vec::new(),
            next_page_url: None,
            previous_page_url: None,
            page_number,
            page_size,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn has_previous_page(&self) -> bool {
        self.previous_page_url
            .as_deref()
            .is_some_and(|url| !url.is_empty())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages implied by `total_count` at the stamped page size.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }
}

/// An ordered collection of assets, as returned by a crawl or a filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetList {
    assets: Vec<Asset>,
}

impl AssetList {
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    /// Asset at a 1-based row number, as shown in numbered tables.
    pub fn get_row(&self, row: usize) -> Option<&Asset> {
        row.checked_sub(1).and_then(|index| self.assets.get(index))
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }
}

impl From<Vec<Asset>> for AssetList {
    fn from(assets: Vec<Asset>) -> Self {
        AssetList { assets }
    }
}

impl FromIterator<Asset> for AssetList {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> AssetList {
        AssetList {
            assets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AssetList {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

fn revit_label(asset: &Asset) -> String {
    if asset.has_revit_family() {
        "[YES]".to_string()
    } else {
        "[NO]".to_string()
    }
}

fn csv_row(asset: &Asset) -> Vec<String> {
    vec![
        asset.id.to_string(),
        asset.type_id.clone(),
        asset.name.clone().unwrap_or_default(),
        asset.manufacturer_name.clone().unwrap_or_default(),
        asset.category_name.clone().unwrap_or_default(),
        asset.model.clone().unwrap_or_default(),
        asset.has_revit_family().to_string(),
    ]
}

fn table_row(asset: &Asset) -> Vec<String> {
    vec![
        asset.name.clone().unwrap_or_default(),
        asset.type_id.clone(),
        asset
            .manufacturer_name
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "N/A".to_string()),
        revit_label(asset),
    ]
}

impl CsvRecordProducer for AssetList {
    fn csv_header() -> Vec<String> {
        vec![
            "ID".to_string(),
            "TYPE_ID".to_string(),
            "NAME".to_string(),
            "MANUFACTURER".to_string(),
            "CATEGORY".to_string(),
            "MODEL".to_string(),
            "REVIT_FAMILY".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        self.assets.iter().map(csv_row).collect()
    }
}

impl TableRecordProducer for AssetList {
    fn table_columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("Name", 35),
            TableColumn::new("Type ID", 10),
            TableColumn::new("Manufacturer", 15),
            TableColumn::new("RFA", 10),
        ]
    }

    fn as_table_rows(&self) -> Vec<Vec<String>> {
        self.assets.iter().map(table_row).collect()
    }

    fn empty_table_message() -> &'static str {
        "No assets found."
    }
}

impl OutputFormatter for AssetList {
    type Item = AssetList;

    fn format(&self, format: OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => {
                if options.pretty {
                    Ok(serde_json::to_string_pretty(&self.assets)?)
                } else {
                    Ok(serde_json::to_string(&self.assets)?)
                }
            }
            OutputFormat::Csv(options) => self.to_csv(options.with_headers),
            OutputFormat::Table(options) => Ok(self.to_table(options.numbered)),
        }
    }
}

impl OutputFormatter for PagedResult<Asset> {
    type Item = PagedResult<Asset>;

    fn format(&self, format: OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => {
                if options.pretty {
                    Ok(serde_json::to_string_pretty(self)?)
                } else {
                    Ok(serde_json::to_string(self)?)
                }
            }
            other => AssetList::from(self.items.clone()).format(other),
        }
    }
}

/// Short one-line label for an asset, used in interactive selection lists.
pub fn asset_label(asset: &Asset) -> String {
    format!(
        "{} | {} | {}",
        truncate(asset.name.as_deref().unwrap_or_default(), 35),
        asset.type_id,
        asset.manufacturer_name.as_deref().unwrap_or("N/A")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;
    use serde_json::json;

    fn file(id: i64, code: &str) -> serde_json::Value {
        json!({
            "id": id,
            "file": format!("https://media.example.com/files/{}.bin", id),
            "category": code,
            "category_display": "Some label",
            "uploaded_at": "2024-05-01T12:00:00.123456Z"
        })
    }

    fn asset_json(id: i64, files: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "id": id,
            "type_id": format!("AVN-{}", id),
            "manufacturer": {"id": 3, "name": "Avantco", "url": "https://avantco.example", "logo": null},
            "manufacturer_name": "Avantco",
            "category": {"id": 9, "name": "Refrigerators"},
            "category_name": "Refrigerators",
            "model": "A-19",
            "name": "Reach-in refrigerator",
            "description": "Two doors",
            "url": "https://avantco.example/a-19",
            "catalog_img": "https://media.example.com/img/a-19.png",
            "overall_height": "2032.00",
            "overall_width": 1371.6,
            "overall_depth": null,
            "custom_fields": {"door_type": "solid", "door_quantity": 2, "glass": false, "extra": null, "nested": {"a": 1}},
            "files": files,
            "_display_units": {"length": "mm", "mass": "kg"}
        })
    }

    #[test]
    fn test_asset_deserialization() {
        let asset: Asset =
            serde_json::from_value(asset_json(1, vec![file(10, "PDS"), file(11, "RFA")])).unwrap();

        assert_eq!(1, asset.id);
        assert_eq!("AVN-1", asset.type_id);
        assert_eq!(Some("Avantco".to_string()), asset.manufacturer_name);
        assert_eq!(
            Some("Avantco".to_string()),
            asset.manufacturer.as_ref().and_then(|m| m.name.clone())
        );
        assert_eq!(Some(2032.0), asset.overall_height);
        assert_eq!(Some(1371.6), asset.overall_width);
        assert_eq!(None, asset.overall_depth);
        assert_eq!(Some("mm"), asset.length_unit());
        assert_eq!(Some(&json!(2)), asset.custom_field("door_quantity"));
        assert_eq!(Some(&json!(false)), asset.custom_field("glass"));
        assert_eq!(Some(&serde_json::Value::Null), asset.custom_field("extra"));
        assert_eq!(2, asset.files.len());
        assert!(asset.files[0].uploaded_at.is_some());
    }

    #[test]
    fn test_derived_file_properties() {
        let asset: Asset = serde_json::from_value(asset_json(
            1,
            vec![file(10, "DWG"), file(11, "RFA"), file(12, "PDS"), file(13, "RFA")],
        ))
        .unwrap();

        assert!(asset.has_revit_family());
        assert_eq!(11, asset.revit_family_file().unwrap().id);
        assert_eq!(12, asset.cut_sheet_file().unwrap().id);
    }

    #[test]
    fn test_derived_properties_follow_file_list() {
        let mut asset: Asset =
            serde_json::from_value(asset_json(1, vec![file(10, "RFA")])).unwrap();
        assert!(asset.has_revit_family());

        asset.files.clear();
        assert!(!asset.has_revit_family());
        assert!(asset.revit_family_file().is_none());
        assert!(asset.cut_sheet_file().is_none());
    }

    #[test]
    fn test_file_category_codes() {
        assert_eq!(AssetFileCategory::CutSheet, AssetFileCategory::from_code("PDS"));
        assert_eq!(AssetFileCategory::CadFile, AssetFileCategory::from_code("DWG"));
        assert_eq!(AssetFileCategory::RevitFamily, AssetFileCategory::from_code("rfa"));
        assert_eq!(AssetFileCategory::Other, AssetFileCategory::from_code("ETC"));
        assert_eq!(AssetFileCategory::Other, AssetFileCategory::from_code("IFC"));

        let category: AssetFileCategory = serde_json::from_value(json!("XYZ")).unwrap();
        assert_eq!(AssetFileCategory::Other, category);
        assert_eq!(json!("RFA"), serde_json::to_value(AssetFileCategory::RevitFamily).unwrap());
    }

    #[test]
    fn test_null_collections_are_empty() {
        let asset: Asset = serde_json::from_value(json!({
            "id": 5,
            "type_id": null,
            "custom_fields": null,
            "files": null,
            "_display_units": null
        }))
        .unwrap();

        assert_eq!("", asset.type_id);
        assert!(asset.custom_fields.is_empty());
        assert!(asset.files.is_empty());
        assert!(asset.display_units.is_empty());
        assert!(!asset.has_revit_family());
    }

    #[test]
    fn test_invalid_decimal_is_rejected() {
        let result = serde_json::from_value::<Asset>(json!({"id": 5, "overall_height": "tall"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_paged_result_with_null_links_and_empty_results() {
        let page = PagedResult::<Asset> {
            total_count: 0,
            items: Vec::new(),
            next_page_url: None,
            previous_page_url: None,
            page_number: 4,
            page_size: 25,
        };

        let json = serde_json::to_string(&page).unwrap();
        let decoded: PagedResult<Asset> = serde_json::from_str(&json).unwrap();

        assert!(decoded.items.is_empty());
        assert_eq!(None, decoded.next_page_url);
        assert_eq!(None, decoded.previous_page_url);
        assert!(!decoded.has_next_page());
        // page data is client-populated and never serialized
        assert!(!json.contains("page_number"));
    }

    #[test]
    fn test_paged_result_null_results() {
        let page: PagedResult<Asset> =
            serde_json::from_str(r#"{"count": 3, "results": null, "next": "", "previous": null}"#)
                .unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_next_page());

        let page: PagedResult<Asset> = serde_json::from_str(r#"{"count": 3}"#).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_timestamp_without_offset_is_read_as_utc() {
        let mut naive = file(10, "RFA");
        naive["uploaded_at"] = json!("2024-05-01T12:00:00.123456");
        let mut missing = file(11, "PDS");
        missing["uploaded_at"] = json!(null);

        let page: PagedResult<Asset> = serde_json::from_value(json!({
            "count": 1,
            "results": [asset_json(1, vec![naive, missing])],
            "next": null,
            "previous": null
        }))
        .unwrap();

        let files = &page.items[0].files;
        let expected = NaiveDateTime::parse_from_str(
            "2024-05-01 12:00:00.123456",
            "%Y-%m-%d %H:%M:%S%.f",
        )
        .unwrap()
        .and_utc();
        assert_eq!(Some(expected), files[0].uploaded_at);
        assert_eq!(None, files[1].uploaded_at);
    }

    #[test]
    fn test_timestamp_with_offset_is_converted_to_utc() {
        let mut shifted = file(10, "RFA");
        shifted["uploaded_at"] = json!("2024-05-01T14:00:00+02:00");
        let parsed: AssetFile = serde_json::from_value(shifted).unwrap();

        let expected = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(Some(expected), parsed.uploaded_at);
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        let mut broken = file(10, "RFA");
        broken["uploaded_at"] = json!("yesterday");
        assert!(serde_json::from_value::<AssetFile>(broken).is_err());
    }

    #[test]
    fn test_total_pages() {
        let mut page = PagedResult::<Asset>::empty(1, 20);
        page.total_count = 41;
        assert_eq!(3, page.total_pages());
        assert_eq!(0, PagedResult::<Asset>::empty(1, 0).total_pages());
    }

    #[test]
    fn test_asset_list_rows() {
        let assets: AssetList = vec![
            serde_json::from_value::<Asset>(asset_json(1, vec![file(11, "RFA")])).unwrap(),
            serde_json::from_value::<Asset>(asset_json(2, vec![])).unwrap(),
        ]
        .into();

        assert_eq!(2, assets.get_row(2).unwrap().id);
        assert!(assets.get_row(0).is_none());
        assert!(assets.get_row(3).is_none());
        assert_eq!(1, assets.find_by_id(1).unwrap().id);

        let csv = assets
            .format(OutputFormat::Csv(OutputFormatOptions {
                with_headers: true,
                ..Default::default()
            }))
            .unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            Some("ID,TYPE_ID,NAME,MANUFACTURER,CATEGORY,MODEL,REVIT_FAMILY"),
            lines.next()
        );
        assert_eq!(
            Some("1,AVN-1,Reach-in refrigerator,Avantco,Refrigerators,A-19,true"),
            lines.next()
        );
    }
}
