mod common;

use common::pdf_assertions::{embedded_program_count, font_names, load_pdf, page_sizes};
use common::*;
use fixpdf::{
    ConvertError, Converter, FixedDocument, FixedPage, FontError, FontRef, FontStyle, GlyphRun, InMemoryResourceProvider,
    PageElement, Point, RenderError, SourceDocument,
};
use fixpdf_fonts::testing::synthetic_font;
use std::fs;

fn single_document(pages: Vec<Option<FixedPage>>) -> SourceDocument {
    SourceDocument {
        documents: vec![FixedDocument { pages }],
    }
}

/// Three pages: Sans everywhere, Serif Bold on the second page only. Page
/// widths differ so order can be checked.
fn three_page_source() -> SourceDocument {
    let mut pages = vec![
        page_with_text(&[(SANS, FontStyle::REGULAR, "Page one")]),
        page_with_text(&[(SANS, FontStyle::REGULAR, "Page two"), (SERIF, FontStyle::BOLD, "Heading")]),
        page_with_text(&[(SANS, FontStyle::REGULAR, "Page three")]),
    ];
    for (i, page) in pages.iter_mut().enumerate() {
        page.width = 600.0 + i as f32;
    }
    single_document(pages.into_iter().map(Some).collect())
}

#[test]
fn three_pages_two_fonts_construct_each_font_once() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.pdf");
    let converter = converter();

    let report = converter.convert(&three_page_source(), &output, 0)?;
    assert_eq!(report.pages, 3);
    assert_eq!(report.fonts, 2);
    assert_eq!(report.output.as_deref(), Some(output.as_path()));
    assert_eq!(converter.cache().stats().constructions, 2);

    let doc = load_pdf(&fs::read(&output)?)?;
    assert_pdf_page_count!(doc, 3);
    let widths: Vec<f32> = page_sizes(&doc).into_iter().map(|(w, _)| w).collect();
    assert_eq!(widths, vec![600.0, 601.0, 602.0]);
    assert_eq!(
        font_names(&doc).into_iter().collect::<Vec<_>>(),
        vec!["TestSans".to_string(), "TestSerif-Bold".to_string()]
    );
    assert_eq!(embedded_program_count(&doc), 2);
    Ok(())
}

#[test]
fn later_conversions_reuse_cached_descriptors() -> TestResult {
    init_logging();
    let converter = converter();
    converter.convert_to_bytes(&three_page_source(), 0)?;
    let after_first = converter.cache().stats();
    converter.convert_to_bytes(&three_page_source(), 1)?;
    let after_second = converter.cache().stats();

    assert_eq!(after_second.constructions, after_first.constructions);
    assert!(after_second.hits > after_first.hits);
    Ok(())
}

#[test]
fn render_failure_on_page_two_leaves_no_file() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.pdf");
    let source = single_document(vec![
        Some(page_with_text(&[(SANS, FontStyle::REGULAR, "fine")])),
        Some(page_with_text(&[("No Such Font", FontStyle::REGULAR, "broken")])),
        Some(page_with_text(&[(SANS, FontStyle::REGULAR, "never reached")])),
    ]);

    let err = converter().convert(&source, &output, 3).unwrap_err();
    match err {
        ConvertError::Render { doc, page, source } => {
            assert_eq!(doc, 3);
            assert_eq!(page, 1);
            assert!(matches!(source, RenderError::Font(FontError::NotFound { .. })), "got {:?}", source);
        }
        other => panic!("expected a render error, got {:?}", other),
    }
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0, "temporary output was not cleaned up");
    Ok(())
}

#[test]
fn failed_conversion_keeps_the_previous_file() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.pdf");
    fs::write(&output, b"previous")?;

    let source = single_document(vec![Some(page_with_text(&[("No Such Font", FontStyle::BOLD, "x")]))]);
    assert!(converter().convert(&source, &output, 0).is_err());
    assert_eq!(fs::read(&output)?, b"previous");
    Ok(())
}

#[test]
fn absent_pages_are_skipped() -> TestResult {
    init_logging();
    let source = SourceDocument {
        documents: vec![
            FixedDocument {
                pages: vec![None, Some(FixedPage::new(100.0, 100.0)), None],
            },
            FixedDocument {
                pages: vec![Some(FixedPage::new(200.0, 200.0))],
            },
        ],
    };
    let dir = tempfile::tempdir()?;
    let report = converter().convert(&source, dir.path().join("out.pdf"), 0)?;
    assert_eq!(report.pages, 2);
    assert_eq!(report.skipped, 2);

    let doc = load_pdf(&fs::read(dir.path().join("out.pdf"))?)?;
    assert_eq!(page_sizes(&doc), vec![(100.0, 100.0), (200.0, 200.0)]);
    Ok(())
}

#[test]
fn empty_output_path_is_rejected() {
    init_logging();
    let result = converter().convert(&three_page_source(), "", 0);
    assert!(matches!(result, Err(ConvertError::InvalidArgument(_))));
}

#[test]
fn source_without_pages_produces_an_empty_pdf() -> TestResult {
    init_logging();
    let bytes = converter().convert_to_bytes(&SourceDocument::default(), 0)?;
    let doc = load_pdf(&bytes)?;
    assert_pdf_page_count!(doc, 0);
    Ok(())
}

#[test]
fn embedded_fonts_load_from_resources() -> TestResult {
    init_logging();
    let resources = InMemoryResourceProvider::new();
    resources.add("fonts/brand.ttf", synthetic_font("Brand", FontStyle::REGULAR))?;
    let converter = converter_with_resources(resources);

    let run = |text: &str| {
        PageElement::Glyphs(GlyphRun {
            origin: Point::new(10.0, 20.0),
            font: FontRef::embedded("Brand", "fonts/brand.ttf"),
            size: 9.0,
            text: text.to_string(),
            fill: Default::default(),
        })
    };
    let source = single_document(vec![
        Some(FixedPage::new(300.0, 300.0).with_element(run("one"))),
        Some(FixedPage::new(300.0, 300.0).with_element(run("two"))),
    ]);

    let bytes = converter.convert_to_bytes(&source, 0)?;
    let doc = load_pdf(&bytes)?;
    assert_eq!(embedded_program_count(&doc), 1);
    assert_eq!(converter.cache().stats().constructions, 1);
    Ok(())
}

#[test]
fn missing_embedded_part_is_a_resource_error() {
    init_logging();
    let converter = converter_with_resources(InMemoryResourceProvider::new());
    let source = single_document(vec![Some(FixedPage::new(100.0, 100.0).with_element(PageElement::Glyphs(
        GlyphRun {
            origin: Point::new(0.0, 10.0),
            font: FontRef::embedded("Gone", "fonts/gone.ttf"),
            size: 9.0,
            text: "x".into(),
            fill: Default::default(),
        },
    )))]);

    match converter.convert_to_bytes(&source, 0) {
        Err(ConvertError::Render { source, .. }) => assert!(matches!(source, RenderError::Resource(_))),
        other => panic!("expected a resource failure, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn read_source_parses_json_from_disk() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("doc.json");
    fs::write(
        &path,
        r#"{ "documents": [ { "pages": [ { "width": 612, "height": 792 }, null ] } ] }"#,
    )?;
    let source = Converter::read_source(&path)?;
    assert_eq!(source.page_count(), 1);

    fs::write(&path, "{ not json")?;
    assert!(matches!(Converter::read_source(&path), Err(ConvertError::Parse(_))));
    assert!(matches!(
        Converter::read_source(dir.path().join("missing.json")),
        Err(ConvertError::Io(_))
    ));
    Ok(())
}
