//! ZPL markup generator for normal and soup labels.
//!
//! A label document is `^XA`, the fixed media directives, one
//! `^CF`/`^FO...^FS` pair per field in template order, and `^XZ`.
//! User-supplied text (code, description, batch code, expiry) is sanitized
//! and hex-escaped; template strings are written as-is.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::clock::Clock;
use crate::error::LabelError;
use crate::field_data::{FIELD_HEX_INDICATOR, escape_field_data};
use crate::layout::{Cursor, FieldKind, LABEL_LENGTH_DOTS, LABEL_WIDTH_DOTS, LayoutConfig};
use crate::model::{LabelKind, ResolvedLabel};
use crate::sanitize::sanitize;
use crate::wrap::{DESCRIPTION_COLUMNS, wrap_words};

/// Format of the print timestamp line.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Care block printed on every soup label.
pub const CARE_INSTRUCTIONS: [&str; 4] = [
    "Conservacao: -10 A -18 graus",
    "ou mais frio.",
    "Validade apos descongelamento:",
    "5 dias",
];

const CODE_PREFIX: &str = "Codigo: ";
const DESCRIPTION_HEADER: &str = "Descricao:";
const BATCH_PREFIX: &str = "Codigo Sopa: ";
const EXPIRY_PREFIX: &str = "Validade: ";
const PRINTED_PREFIX: &str = "Data: ";

/// Generate the markup for `label` printed at `printed_at`.
///
/// Soup labels must carry a non-blank batch code. The result depends only
/// on the arguments, so a failed print can be resent by regenerating.
pub fn generate(
    label: &ResolvedLabel,
    layout: &LayoutConfig,
    printed_at: NaiveDateTime,
) -> Result<String, LabelError> {
    layout.validate()?;

    let batch_code = match label.kind {
        LabelKind::Normal => None,
        LabelKind::Soup => match label.batch_code.as_deref().map(str::trim) {
            Some(batch) if !batch.is_empty() => Some(batch),
            _ => {
                return Err(LabelError::MissingBatchCode {
                    code: label.code.clone(),
                });
            }
        },
    };

    let mut doc = Document::open(layout);

    doc.field(FieldKind::Title, &user_text(CODE_PREFIX, &label.code));
    doc.cursor.advance(FieldKind::Title);

    doc.field(FieldKind::Subtitle, DESCRIPTION_HEADER);
    doc.cursor.advance(FieldKind::Subtitle);

    for line in wrap_words(&sanitize(&label.description), DESCRIPTION_COLUMNS) {
        doc.field(FieldKind::Body, &escape(&line));
        doc.cursor.advance(FieldKind::Body);
    }
    doc.cursor.gap();

    if let Some(batch) = batch_code {
        doc.field(FieldKind::Subtitle, &user_text(BATCH_PREFIX, batch));
        doc.cursor.advance(FieldKind::Subtitle);
    }

    doc.field(
        FieldKind::Subtitle,
        &user_text(EXPIRY_PREFIX, &label.expiry_text()),
    );
    doc.cursor.advance(FieldKind::Subtitle);

    if label.kind == LabelKind::Soup {
        for line in CARE_INSTRUCTIONS {
            doc.field(FieldKind::Care, line);
            doc.cursor.advance(FieldKind::Care);
        }
        doc.cursor.gap();
    }

    let printed = printed_at.format(TIMESTAMP_FORMAT);
    doc.field(FieldKind::Body, &format!("{PRINTED_PREFIX}{printed}"));

    let markup = doc.close();
    debug!(
        code = %label.code,
        kind = label.kind.as_str(),
        bytes = markup.len(),
        "label markup generated"
    );
    Ok(markup)
}

/// Generates markup stamped with the time read from a [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct MarkupGenerator<K> {
    clock: K,
}

impl<K: Clock> MarkupGenerator<K> {
    /// Create a generator that timestamps labels with `clock`.
    pub fn new(clock: K) -> Self {
        Self { clock }
    }

    /// Generate the markup for `label` printed now.
    pub fn generate(
        &self,
        label: &ResolvedLabel,
        layout: &LayoutConfig,
    ) -> Result<String, LabelError> {
        generate(label, layout, self.clock.now())
    }
}

/// Fixed self-test document used to check that a printer is reachable.
pub fn test_label() -> String {
    let mut out = media_header();
    out.push_str("^CF0,50\n");
    out.push_str("^FO50,50^A0N,50,50^FDTESTE^FS\n");
    out.push_str("^FO50,150^A0N,30,30^FDSistema de Etiquetas^FS\n");
    out.push_str("^FO50,250^A0N,25,25^FDImpressora OK!^FS\n");
    out.push_str("^XZ");
    out
}

// ── Document assembly ───────────────────────────────────────────────────

fn media_header() -> String {
    format!("^XA\n^MMT\n^PW{LABEL_WIDTH_DOTS}\n^LL{LABEL_LENGTH_DOTS}\n^LS0\n")
}

fn escape(text: &str) -> String {
    escape_field_data(text, FIELD_HEX_INDICATOR)
}

fn user_text(prefix: &str, value: &str) -> String {
    format!("{prefix}{}", escape(&sanitize(value)))
}

struct Document<'a> {
    out: String,
    layout: &'a LayoutConfig,
    cursor: Cursor,
}

impl<'a> Document<'a> {
    fn open(layout: &'a LayoutConfig) -> Self {
        Self {
            out: media_header(),
            layout,
            cursor: Cursor::new(layout),
        }
    }

    /// Write one field at the cursor. `data` must already be escaped.
    fn field(&mut self, kind: FieldKind, data: &str) {
        let height = self.layout.font_height(kind);
        self.out.push_str(&format!("^CF0,{height}\n"));
        self.out.push_str(&format!(
            "^FO{x},{y}^A0{o},{height},{height}^FH{indicator}^FD{data}^FS\n",
            x = self.layout.origin_x(),
            y = self.cursor.y(),
            o = self.layout.orientation(),
            indicator = FIELD_HEX_INDICATOR as char,
        ));
    }

    fn close(mut self) -> String {
        self.out.push_str("^XZ");
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn printed_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn label(kind: LabelKind, description: &str) -> ResolvedLabel {
        ResolvedLabel {
            code: "M-01".into(),
            description: description.into(),
            kind,
            shelf_life_days: 3,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            batch_code: None,
            care_instructions: Vec::new(),
        }
    }

    fn field_data(markup: &str) -> Vec<&str> {
        markup
            .lines()
            .filter_map(|line| line.split_once("^FD"))
            .map(|(_, rest)| rest.trim_end_matches("^FS"))
            .collect()
    }

    #[test]
    fn normal_label_field_order() {
        let markup = generate(
            &label(LabelKind::Normal, "Arroz Branco Temperado com Legumes e Batata"),
            &LayoutConfig::default(),
            printed_at(),
        )
        .unwrap();
        assert_eq!(
            field_data(&markup),
            [
                "Codigo: M-01",
                "Descricao:",
                "Arroz Branco Temperado com",
                "Legumes e Batata",
                "Validade: 13/01/2025",
                "Data: 10/01/2025 08:30",
            ]
        );
        assert!(markup.starts_with("^XA\n^MMT\n^PW472\n^LL1181\n^LS0\n"));
        assert!(markup.ends_with("^FS\n^XZ"));
    }

    #[test]
    fn soup_label_requires_batch_code() {
        let soup = label(LabelKind::Soup, "Sopa de Legumes");
        let err = generate(&soup, &LayoutConfig::default(), printed_at()).unwrap_err();
        assert_eq!(
            err,
            LabelError::MissingBatchCode {
                code: "M-01".into()
            }
        );

        let blank = soup.with_batch_code("   ");
        assert!(generate(&blank, &LayoutConfig::default(), printed_at()).is_err());
    }

    #[test]
    fn soup_label_field_order() {
        let soup = label(LabelKind::Soup, "Sopa de Legumes").with_batch_code("01M007");
        let markup = generate(&soup, &LayoutConfig::default(), printed_at()).unwrap();
        assert_eq!(
            field_data(&markup),
            [
                "Codigo: M-01",
                "Descricao:",
                "Sopa de Legumes",
                "Codigo Sopa: 01M007",
                "Validade: 13/01/2025",
                "Conservacao: -10 A -18 graus",
                "ou mais frio.",
                "Validade apos descongelamento:",
                "5 dias",
                "Data: 10/01/2025 08:30",
            ]
        );
    }

    #[test]
    fn care_block_ignores_record_instructions() {
        let mut soup = label(LabelKind::Soup, "Caldo").with_batch_code("02T001");
        soup.care_instructions = vec!["something else".into()];
        let markup = generate(&soup, &LayoutConfig::default(), printed_at()).unwrap();
        assert!(!markup.contains("something else"));
        assert!(markup.contains("^FDou mais frio.^FS"));
    }

    #[test]
    fn user_text_is_sanitized_and_escaped() {
        let mut item = label(LabelKind::Normal, "Feijão ^preto~ 100%");
        item.code = "A\\B".into();
        let markup = generate(&item, &LayoutConfig::default(), printed_at()).unwrap();
        assert!(markup.contains(r"^FDCodigo: A\5CB^FS"));
        assert!(markup.contains(r"^FDFeijao \5Epreto\7E 100%^FS"));
        assert!(markup.is_ascii());
    }

    #[test]
    fn left_aligned_layout_uses_margin_origin() {
        let layout = LayoutConfig {
            centered: false,
            margin_x: 10,
            ..LayoutConfig::default()
        };
        let markup = generate(&label(LabelKind::Normal, "Pao"), &layout, printed_at()).unwrap();
        assert!(markup.contains("^FO80,160^A0N,54,54^FH\\^FDCodigo: M-01^FS"));
        assert!(!markup.contains("^A0C"));
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let layout = LayoutConfig {
            line_spacing: 0,
            ..LayoutConfig::default()
        };
        let err = generate(&label(LabelKind::Normal, "Pao"), &layout, printed_at()).unwrap_err();
        assert!(matches!(err, LabelError::InvalidLayout { field: "line_spacing", .. }));
    }

    #[test]
    fn generation_is_repeatable() {
        let item = label(LabelKind::Normal, "Frango assado");
        let layout = LayoutConfig::default();
        assert_eq!(
            generate(&item, &layout, printed_at()).unwrap(),
            generate(&item, &layout, printed_at()).unwrap()
        );
    }

    #[test]
    fn test_label_is_a_complete_document() {
        let doc = test_label();
        assert!(doc.starts_with("^XA\n^MMT\n^PW472\n^LL1181\n^LS0\n"));
        assert!(doc.contains("^FDImpressora OK!^FS"));
        assert!(doc.ends_with("^XZ"));
    }
}
