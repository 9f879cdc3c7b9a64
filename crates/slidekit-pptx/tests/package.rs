//! Package-level tests
//!
//! Every test builds a presentation, writes it to memory and inspects the
//! resulting archive with `zip::ZipArchive`.
//!
//! Test Categories:
//! 1. Archive structure - part counts, relationships, content types
//! 2. Emitted XML - well-formedness, units, z-order
//! 3. End-to-end decks - text, charts, images, media timing

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use slidekit_pptx::{
    ChartOptions, ImageOptions, Presentation, ShapeOptions, ShapeType, TableCell, TableOptions,
    TextOptions, VideoOptions,
};
use zip::ZipArchive;

const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];
const MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00";

/// Unpack an archive into name -> bytes, preserving nothing but content
fn unpack(bytes: Vec<u8>) -> BTreeMap<String, Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut parts = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        parts.insert(file.name().to_string(), data);
    }
    parts
}

fn text(parts: &BTreeMap<String, Vec<u8>>, name: &str) -> String {
    let data = parts
        .get(name)
        .unwrap_or_else(|| panic!("missing part {}", name));
    String::from_utf8(data.clone()).unwrap()
}

fn assert_well_formed(name: &str, xml: &str) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("{} is not well-formed at {}: {}", name, reader.buffer_position(), e),
        }
    }
}

/// Relationship (id, target) pairs of a `.rels` part
fn rel_targets(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let mut id = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().unwrap().into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Target" => target = value,
                        _ => {}
                    }
                }
                out.push((id, target));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("bad rels: {}", e),
        }
    }
    out
}

/// Resolve a relationship target against the directory of its source part
fn resolve(rels_name: &str, target: &str) -> String {
    // ppt/slides/_rels/slide1.xml.rels -> ppt/slides
    let base: Vec<&str> = match rels_name.rsplit_once("_rels/") {
        Some((dir, _)) => dir.trim_end_matches('/').split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    let mut path: Vec<&str> = base;
    for segment in target.split('/') {
        match segment {
            ".." => {
                path.pop();
            }
            "." | "" => {}
            s => path.push(s),
        }
    }
    path.join("/")
}

fn sample_deck() -> Presentation {
    let mut pres = Presentation::new();
    pres.set_title("Sample").set_timestamp("2024-01-01T00:00:00Z");

    pres.add_slide()
        .add_text(
            "Title & more",
            TextOptions {
                x: 1.0,
                y: 1.0,
                font_size: 24.0,
                bold: true,
                ..Default::default()
            },
        )
        .add_shape_with_text(ShapeType::RoundRect, "Box", ShapeOptions::default())
        .add_table(
            vec![
                vec!["A".into(), "B".into()],
                vec![TableCell::new("1"), TableCell::new("2")],
            ],
            TableOptions {
                first_row_bold: true,
                ..Default::default()
            },
        );

    pres.add_slide()
        .add_image(ImageOptions {
            data: PNG.to_vec(),
            alt_text: "logo".to_string(),
            ..Default::default()
        })
        .add_bar_chart(
            "Sales",
            &["Q1", "Q2", "Q3"],
            &[("2023", vec![1.0, 2.0, 3.0]), ("2024", vec![2.0, 3.0, 4.0])],
            ChartOptions::default(),
        )
        .add_pie_chart("Share", &["a", "b"], vec![60.0, 40.0], ChartOptions::default());

    pres.add_slide().add_video(VideoOptions {
        data: MP4.to_vec(),
        poster_data: PNG.to_vec(),
        auto_play: true,
        looping: true,
        ..Default::default()
    });

    pres
}

// =============================================================================
// PART 1: ARCHIVE STRUCTURE
// =============================================================================

#[test]
fn test_part_counts_match_model() {
    let pres = sample_deck();
    let parts = unpack(pres.to_bytes().unwrap());

    let slides = parts
        .keys()
        .filter(|n| n.starts_with("ppt/slides/slide"))
        .count();
    let charts = parts.keys().filter(|n| n.starts_with("ppt/charts/")).count();
    let media = parts.keys().filter(|n| n.starts_with("ppt/media/")).count();

    assert_eq!(slides, pres.slide_count());
    assert_eq!(charts, pres.chart_count());
    assert_eq!(media, pres.media().len());
    assert_eq!(media, 3);
}

#[test]
fn test_every_relationship_resolves() {
    let parts = unpack(sample_deck().to_bytes().unwrap());

    for (name, data) in &parts {
        if !name.ends_with(".rels") {
            continue;
        }
        let xml = String::from_utf8(data.clone()).unwrap();
        let rels = rel_targets(&xml);
        let mut ids: Vec<&str> = rels.iter().map(|(id, _)| id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "duplicate relationship ids in {}", name);

        for (id, target) in &rels {
            let resolved = resolve(name, target);
            assert!(
                parts.contains_key(&resolved),
                "{} {} points at missing part {}",
                name,
                id,
                resolved
            );
        }
    }
}

#[test]
fn test_content_types_cover_every_part() {
    let parts = unpack(sample_deck().to_bytes().unwrap());
    let types = text(&parts, "[Content_Types].xml");

    for name in parts.keys() {
        if name == "[Content_Types].xml" {
            continue;
        }
        let ext = name.rsplit('.').next().unwrap();
        let by_default = types.contains(&format!(r#"<Default Extension="{}""#, ext));
        let by_override = types.contains(&format!(r#"PartName="/{}""#, name));
        assert!(by_default || by_override, "no content type for {}", name);
    }
    assert!(types.contains(r#"<Default Extension="mp4" ContentType="video/mp4"/>"#));
}

#[test]
fn test_empty_deck_is_valid() {
    let parts = unpack(Presentation::new().to_bytes().unwrap());
    assert!(parts.contains_key("ppt/presentation.xml"));
    assert!(!parts.keys().any(|n| n.starts_with("ppt/slides/")));
    assert!(text(&parts, "ppt/presentation.xml").contains("<p:sldIdLst>\n  </p:sldIdLst>"));
    for (name, data) in &parts {
        assert_well_formed(name, std::str::from_utf8(data).unwrap());
    }
}

// =============================================================================
// PART 2: EMITTED XML
// =============================================================================

#[test]
fn test_all_parts_are_well_formed() {
    let parts = unpack(sample_deck().to_bytes().unwrap());
    for (name, data) in &parts {
        if name.ends_with(".xml") || name.ends_with(".rels") {
            assert_well_formed(name, std::str::from_utf8(data).unwrap());
        }
    }
}

#[test]
fn test_insertion_order_is_z_order() {
    let parts = unpack(sample_deck().to_bytes().unwrap());
    let slide = text(&parts, "ppt/slides/slide1.xml");

    let text_pos = slide.find(r#"name="TextBox 2""#).unwrap();
    let shape_pos = slide.find(r#"name="Shape 3""#).unwrap();
    let table_pos = slide.find(r#"name="Table 4""#).unwrap();
    assert!(text_pos < shape_pos && shape_pos < table_pos);
}

#[test]
fn test_fixed_timestamp_gives_identical_parts() {
    let pres = sample_deck();
    let first = unpack(pres.to_bytes().unwrap());
    let second = unpack(pres.to_bytes().unwrap());
    assert_eq!(first, second);
    assert!(text(&first, "docProps/core.xml").contains("2024-01-01T00:00:00Z"));
}

// =============================================================================
// PART 3: END-TO-END DECKS
// =============================================================================

#[test]
fn test_single_text_box() {
    let mut pres = Presentation::new();
    pres.add_slide().add_text(
        "Hello",
        TextOptions {
            x: 1.0,
            y: 1.0,
            font_size: 24.0,
            bold: true,
            ..Default::default()
        },
    );
    let parts = unpack(pres.to_bytes().unwrap());
    let slide = text(&parts, "ppt/slides/slide1.xml");
    assert!(slide.contains(r#"sz="2400" b="1""#));
    assert!(slide.contains(r#"<a:off x="914400" y="914400"/>"#));
    assert!(slide.contains("<a:t>Hello</a:t>"));
}

#[test]
fn test_bar_chart_part() {
    let parts = unpack(sample_deck().to_bytes().unwrap());
    let chart = text(&parts, "ppt/charts/chart1.xml");
    assert!(chart.contains("<c:barChart>"));
    assert!(chart.contains("<c:strCache>"));
    assert!(chart.contains("<c:numCache>"));
    assert!(chart.contains(r#"<c:catAx><c:axId val="1"/>"#));
    assert!(chart.contains(r#"<c:valAx><c:axId val="2"/>"#));

    let pie = text(&parts, "ppt/charts/chart2.xml");
    assert!(pie.contains("<c:pieChart>"));
    assert!(!pie.contains("<c:catAx>"));

    let rels = text(&parts, "ppt/slides/_rels/slide2.xml.rels");
    assert!(rels.contains(r#"Id="rId201""#));
    assert!(rels.contains(r#"Id="rId202""#));
}

#[test]
fn test_image_part() {
    let parts = unpack(sample_deck().to_bytes().unwrap());
    assert_eq!(parts.get("ppt/media/image1.png").map(Vec::as_slice), Some(PNG));

    let rels = text(&parts, "ppt/slides/_rels/slide2.xml.rels");
    assert!(rels.contains(r#"Id="rId101""#));
    assert!(rels.contains(r#"Target="../media/image1.png""#));

    let slide = text(&parts, "ppt/slides/slide2.xml");
    assert!(slide.contains(r#"<a:blip r:embed="rId101"/>"#));
    assert!(slide.contains(r#"descr="logo""#));
}

#[test]
fn test_auto_play_video_targets_its_shape() {
    let parts = unpack(sample_deck().to_bytes().unwrap());
    let slide = text(&parts, "ppt/slides/slide3.xml");

    assert!(slide.contains(r#"<p:cNvPr id="2" name="Video 2">"#));
    assert!(slide.contains(r#"<p:spTgt spid="2"/>"#));
    assert!(slide.contains(r#"cmd="playFrom(0.0)""#));
    assert!(slide.contains(r#"repeatCount="indefinite""#));
    assert!(slide.contains(r#"<a:videoFile r:link="rId302"/>"#));

    assert!(parts.contains_key("ppt/media/video2.mp4"));
    assert!(parts.contains_key("ppt/media/poster3.png"));
}

#[test]
fn test_write_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    sample_deck().write_file(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let parts = unpack(bytes);
    assert_eq!(
        parts.keys().filter(|n| n.starts_with("ppt/slides/slide")).count(),
        3
    );
}

#[test]
fn test_image_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.JPG");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]).unwrap();

    let mut pres = Presentation::new();
    pres.add_slide()
        .add_image(ImageOptions {
            path: Some(path),
            ..Default::default()
        })
        .add_image(ImageOptions {
            path: Some(dir.path().join("missing.png")),
            ..Default::default()
        });

    assert_eq!(pres.slide(0).unwrap().objects().len(), 1);
    let parts = unpack(pres.to_bytes().unwrap());
    assert!(parts.contains_key("ppt/media/image1.jpg"));
    assert!(text(&parts, "[Content_Types].xml")
        .contains(r#"<Default Extension="jpg" ContentType="image/jpeg"/>"#));
}

#[test]
fn test_crowded_slide_keeps_rel_ids_unique() {
    let mut pres = Presentation::new();
    let mut slide = pres.add_slide();
    for _ in 0..101 {
        slide.add_image(ImageOptions {
            data: PNG.to_vec(),
            ..Default::default()
        });
    }
    slide.add_bar_chart("Crowded", &["a"], &[("s", vec![1.0])], ChartOptions::default());

    let parts = unpack(pres.to_bytes().unwrap());
    let rels = rel_targets(&text(&parts, "ppt/slides/_rels/slide1.xml.rels"));
    assert_eq!(rels.len(), 1 + 101 + 1);

    let mut ids: Vec<&str> = rels.iter().map(|(id, _)| id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), rels.len());

    let id_of = |target: &str| {
        rels.iter()
            .find(|(_, t)| t == target)
            .map(|(id, _)| id.clone())
            .unwrap_or_else(|| panic!("no relationship to {}", target))
    };
    // The 101st image keeps its offset id; the chart moves to the next free one
    assert_eq!(id_of("../media/image101.png"), "rId201");
    assert_eq!(id_of("../charts/chart1.xml"), "rId202");

    let slide = text(&parts, "ppt/slides/slide1.xml");
    assert_eq!(slide.matches(r#"r:embed="rId201""#).count(), 1);
    assert!(slide.contains(r#"r:id="rId202""#));
    assert!(parts.contains_key("ppt/charts/chart1.xml"));
}
