use engrave::content::frontmatter::parse_front_matter;
use engrave::content::sections::{Section, build_sections, render_sections};
use engrave::{CommonMarkRenderer, DirAssetSource, MarkdownRenderer, ToolCatalog};

fn write_tool(root: &std::path::Path, key: &str, body: &str) {
    let dir = root.join("content").join("tools");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{key}.md")), body).unwrap();
}

#[test]
fn front_matter_examples() {
    let fm = parse_front_matter("---\ntitle: Maya\nicon: M\n---\nBody text");
    assert_eq!(fm.get("title"), Some("Maya"));
    assert_eq!(fm.get("icon"), Some("M"));
    assert_eq!(fm.body, "Body text");

    let plain = "No header here.\n---\nStill body";
    let fm = parse_front_matter(plain);
    assert!(fm.meta.is_empty());
    assert_eq!(fm.body, plain);
}

#[test]
fn markdown_document_becomes_sections() {
    let md = "![Viewport](img/vp.png)\n\nBlueprint graphs.\n\n---\n\n## Notes\n\nPlain text.\n";
    let html = CommonMarkRenderer.render(md);
    let sections = build_sections(&html);
    assert_eq!(sections.len(), 2);

    match &sections[0] {
        Section::Split { images, text_html } => {
            assert_eq!(images.len(), 1);
            assert_eq!(images[0].src, "img/vp.png");
            assert_eq!(images[0].alt, "Viewport");
            assert!(text_html.contains("Blueprint graphs."));
            assert!(!text_html.contains("<img"));
        }
        other => panic!("expected split section, got {other:?}"),
    }
    assert!(matches!(&sections[1], Section::Full { html } if html.contains("<h2>Notes</h2>")));

    let markup = render_sections(&html);
    assert_eq!(markup.matches("tool-page__section--full").count(), 1);
    assert!(markup.contains(r#"class="project-card__gallery-img""#));
}

#[test]
fn catalog_reads_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_tool(
        dir.path(),
        "ue",
        "---\ntitle: Unreal Engine\nsubtitle: Realtime\n---\n![a](ue/a.png)\n\nText.",
    );
    write_tool(dir.path(), "mb", "Only text.");

    let mut catalog = ToolCatalog::new(
        Box::new(DirAssetSource::new(dir.path())),
        Box::new(CommonMarkRenderer),
        vec!["ue".into(), "maya".into(), "mb".into()],
    );

    let ue = catalog.load("ue").unwrap();
    assert_eq!(ue.icon, "UE");
    assert_eq!(ue.title, "Unreal Engine");
    assert_eq!(ue.subtitle, "Realtime");

    let mb = catalog.load("mb").unwrap();
    assert_eq!(mb.title, "mb");
    assert_eq!(mb.subtitle, "");

    assert!(catalog.load("maya").is_none());

    let previews = catalog.previews();
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].key, "ue");
    assert_eq!(previews[0].image_src, "ue/a.png");

    // A document that appears later is picked up on retry.
    write_tool(dir.path(), "maya", "---\ntitle: Maya\n---\n![m](m.png)");
    assert_eq!(catalog.load("maya").unwrap().title, "Maya");
    assert_eq!(catalog.previews().len(), 2);
}
