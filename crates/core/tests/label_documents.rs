//! End-to-end label documents: catalog lookup through finished markup.

use chrono::NaiveDate;
use food_label_core::{
    BatchCode, FixedClock, InMemoryCatalog, LabelKind, LayoutConfig, MarkupGenerator,
    MaterialRecord, Resolver, Shift,
};

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap(),
    )
}

fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    for record in [
        MaterialRecord::new(
            "ARZ01",
            "Arroz Branco Temperado com Legumes e Batata",
            3,
            "Alimento Normal",
            false,
        ),
        MaterialRecord::new("SOP001", "Sopa de Legumes", 30, "Sopa", true),
        MaterialRecord::new("CLD07", "Caldo de Galinha", 45, "Ingrediente", true),
    ] {
        catalog.insert(record.unwrap()).unwrap();
    }
    catalog
}

#[test]
fn normal_label_document() {
    let resolver = Resolver::new(catalog(), clock());
    let label = resolver.resolve("ARZ01").unwrap().unwrap();
    assert_eq!(label.kind, LabelKind::Normal);

    let markup = MarkupGenerator::new(clock())
        .generate(&label, &LayoutConfig::default())
        .unwrap();

    let expected = "\
^XA
^MMT
^PW472
^LL1181
^LS0
^CF0,54
^FO236,160^A0C,54,54^FH\\^FDCodigo: ARZ01^FS
^CF0,28
^FO236,235^A0C,28,28^FH\\^FDDescricao:^FS
^CF0,24
^FO236,285^A0C,24,24^FH\\^FDArroz Branco Temperado com^FS
^CF0,24
^FO236,323^A0C,24,24^FH\\^FDLegumes e Batata^FS
^CF0,28
^FO236,385^A0C,28,28^FH\\^FDValidade: 13/01/2025^FS
^CF0,24
^FO236,435^A0C,24,24^FH\\^FDData: 10/01/2025 08:30^FS
^XZ";
    assert_eq!(markup, expected);
}

#[test]
fn special_soup_label_document() {
    let resolver = Resolver::new(catalog(), clock());
    let batch = BatchCode::new("1", Shift::Morning, "7").unwrap();
    let label = resolver
        .resolve("SOP001")
        .unwrap()
        .unwrap()
        .with_batch_code(batch.to_string());
    assert_eq!(label.shelf_life_days, 90);

    let markup = MarkupGenerator::new(clock())
        .generate(&label, &LayoutConfig::default())
        .unwrap();

    let expected = "\
^XA
^MMT
^PW472
^LL1181
^LS0
^CF0,54
^FO236,160^A0C,54,54^FH\\^FDCodigo: SOP001^FS
^CF0,28
^FO236,235^A0C,28,28^FH\\^FDDescricao:^FS
^CF0,24
^FO236,285^A0C,24,24^FH\\^FDSopa de Legumes^FS
^CF0,28
^FO236,348^A0C,28,28^FH\\^FDCodigo Sopa: 01M007^FS
^CF0,28
^FO236,398^A0C,28,28^FH\\^FDValidade: 10/04/2025^FS
^CF0,24
^FO236,448^A0C,24,24^FH\\^FDConservacao: -10 A -18 graus^FS
^CF0,24
^FO236,478^A0C,24,24^FH\\^FDou mais frio.^FS
^CF0,24
^FO236,508^A0C,24,24^FH\\^FDValidade apos descongelamento:^FS
^CF0,24
^FO236,538^A0C,24,24^FH\\^FD5 dias^FS
^CF0,24
^FO236,593^A0C,24,24^FH\\^FDData: 10/01/2025 08:30^FS
^XZ";
    assert_eq!(markup, expected);
}

#[test]
fn soup_outside_baseline_keeps_catalog_days() {
    let resolver = Resolver::new(catalog(), clock());
    let label = resolver.resolve("CLD07").unwrap().unwrap();
    assert_eq!(label.kind, LabelKind::Soup);
    assert_eq!(label.shelf_life_days, 45);
    assert_eq!(
        label.expiry_date,
        NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()
    );
}

#[test]
fn unknown_code_resolves_to_none() {
    let resolver = Resolver::new(catalog(), clock());
    assert!(resolver.resolve("XYZ").unwrap().is_none());
}
