//! Package-level parts: content types, root and presentation relationships,
//! document properties, presentation settings, theme, master and layout.

use chrono::Utc;

use crate::constants::*;
use crate::media::mime_type;
use crate::presentation::Presentation;
use crate::relationships::Relationships;

use super::escape_xml;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Application name written to `docProps/app.xml`
const APPLICATION_NAME: &str = "slidekit";

/// Version written to `docProps/app.xml`
const APP_VERSION: &str = "16.0000";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_PRES_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_CHART: &str = "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// `[Content_Types].xml`
pub fn content_types(pres: &Presentation) -> String {
    let mut content = format!(
        "{}\n<Types xmlns=\"{}\">\n",
        XML_DECLARATION, NS_CONTENT_TYPES
    );
    content.push_str(&format!(
        "  <Default Extension=\"rels\" ContentType=\"{}\"/>\n",
        CT_RELS
    ));
    content.push_str("  <Default Extension=\"xml\" ContentType=\"application/xml\"/>\n");

    // One default per distinct media extension, first use wins
    let mut seen: Vec<&str> = Vec::new();
    for entry in pres.media() {
        let ext = entry.ext.as_str();
        if ext.is_empty() || seen.contains(&ext) {
            continue;
        }
        seen.push(ext);
        content.push_str(&format!(
            "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
            escape_xml(ext),
            mime_type(ext)
        ));
    }

    let fixed = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/presProps.xml", CT_PRES_PROPS),
        ("/ppt/viewProps.xml", CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
        ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/docProps/core.xml", CT_CORE),
        ("/docProps/app.xml", CT_APP),
    ];
    for (part, content_type) in fixed {
        content.push_str(&format!(
            "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
            part, content_type
        ));
    }

    for i in 1..=pres.slide_count() {
        content.push_str(&format!(
            "  <Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"{}\"/>\n",
            i, CT_SLIDE
        ));
    }

    for k in 1..=pres.chart_count() {
        content.push_str(&format!(
            "  <Override PartName=\"/ppt/charts/chart{}.xml\" ContentType=\"{}\"/>\n",
            k, CT_CHART
        ));
    }

    content.push_str("</Types>");
    content
}

/// `_rels/.rels`
pub fn root_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add("rId1", REL_TYPE_OFFICE_DOCUMENT, "ppt/presentation.xml");
    rels.add("rId2", REL_TYPE_CORE_PROPERTIES, "docProps/core.xml");
    rels.add("rId3", REL_TYPE_EXTENDED_PROPERTIES, "docProps/app.xml");
    rels
}

/// `docProps/core.xml`
pub fn core_xml(pres: &Presentation) -> String {
    let props = pres.properties();
    let now = match pres.timestamp() {
        Some(ts) => ts.to_string(),
        None => Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    };

    let mut fields = String::new();
    if !props.title.is_empty() {
        fields.push_str(&format!("  <dc:title>{}</dc:title>\n", escape_xml(&props.title)));
    }
    if !props.subject.is_empty() {
        fields.push_str(&format!(
            "  <dc:subject>{}</dc:subject>\n",
            escape_xml(&props.subject)
        ));
    }
    if !props.author.is_empty() {
        let author = escape_xml(&props.author);
        fields.push_str(&format!("  <dc:creator>{}</dc:creator>\n", author));
        fields.push_str(&format!(
            "  <cp:lastModifiedBy>{}</cp:lastModifiedBy>\n",
            author
        ));
    }

    format!(
        r#"{}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
{}  <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>
</cp:coreProperties>"#,
        XML_DECLARATION,
        fields,
        escape_xml(&now),
        escape_xml(&now)
    )
}

/// `docProps/app.xml`
pub fn app_xml(pres: &Presentation) -> String {
    let company = &pres.properties().company;
    let company = if company.is_empty() {
        String::new()
    } else {
        format!("  <Company>{}</Company>\n", escape_xml(company))
    };

    format!(
        r#"{}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>0</TotalTime>
  <Words>0</Words>
  <Application>{}</Application>
  <PresentationFormat>Custom</PresentationFormat>
  <Paragraphs>0</Paragraphs>
  <Slides>{}</Slides>
  <Notes>0</Notes>
  <HiddenSlides>0</HiddenSlides>
  <MMClips>0</MMClips>
  <ScaleCrop>false</ScaleCrop>
{}  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>{}</AppVersion>
</Properties>"#,
        XML_DECLARATION,
        APPLICATION_NAME,
        pres.slide_count(),
        company,
        APP_VERSION
    )
}

/// `ppt/presentation.xml`
pub fn presentation_xml(pres: &Presentation) -> String {
    let (cx, cy) = pres.slide_size();

    let mut slide_refs = String::new();
    for i in 0..pres.slide_count() {
        slide_refs.push_str(&format!(
            "    <p:sldId id=\"{}\" r:id=\"rId{}\"/>\n",
            FIRST_SLIDE_ID as usize + i,
            i + 2 // rId1 is the master
        ));
    }

    format!(
        r#"{}
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">
  <p:sldMasterIdLst>
    <p:sldMasterId id="{}" r:id="rId1"/>
  </p:sldMasterIdLst>
  <p:sldIdLst>
{}  </p:sldIdLst>
  <p:sldSz cx="{}" cy="{}" type="custom"/>
  <p:notesSz cx="{}" cy="{}"/>
  <p:defaultTextStyle>
    <a:defPPr><a:defRPr lang="en-US"/></a:defPPr>
  </p:defaultTextStyle>
</p:presentation>"#,
        XML_DECLARATION,
        NS_DRAWING,
        NS_RELATIONSHIPS,
        NS_PRESENTATION,
        SLIDE_MASTER_ID,
        slide_refs,
        cx,
        cy,
        NOTES_WIDTH_EMU,
        NOTES_HEIGHT_EMU
    )
}

/// `ppt/_rels/presentation.xml.rels`: master, slides, then the settings parts
pub fn presentation_rels(pres: &Presentation) -> Relationships {
    let mut rels = Relationships::new();
    rels.add(
        "rId1",
        REL_TYPE_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    );

    let n = pres.slide_count();
    for i in 1..=n {
        rels.add(
            format!("rId{}", i + 1),
            REL_TYPE_SLIDE,
            format!("slides/slide{}.xml", i),
        );
    }

    let tail = [
        (REL_TYPE_PRES_PROPS, "presProps.xml"),
        (REL_TYPE_VIEW_PROPS, "viewProps.xml"),
        (REL_TYPE_TABLE_STYLES, "tableStyles.xml"),
        (REL_TYPE_THEME, "theme/theme1.xml"),
    ];
    for (offset, (rel_type, target)) in tail.into_iter().enumerate() {
        rels.add(format!("rId{}", n + 2 + offset), rel_type, target);
    }
    rels
}

/// `ppt/presProps.xml`
pub fn pres_props() -> String {
    format!(
        r#"{}
<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:extLst>
    <p:ext uri="{{E76CE94A-603C-4142-B9EB-6D1370010A27}}">
      <p14:discardImageEditData xmlns:p14="{}" val="0"/>
    </p:ext>
  </p:extLst>
</p:presentationPr>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, NS_P14
    )
}

/// `ppt/viewProps.xml`
pub fn view_props() -> String {
    format!(
        r#"{}
<p:viewPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:normalViewPr>
    <p:restoredLeft sz="15620"/>
    <p:restoredTop sz="94660"/>
  </p:normalViewPr>
  <p:slideViewPr>
    <p:cSldViewPr>
      <p:cViewPr varScale="1">
        <p:scale>
          <a:sx n="100" d="100"/>
          <a:sy n="100" d="100"/>
        </p:scale>
        <p:origin x="0" y="0"/>
      </p:cViewPr>
    </p:cSldViewPr>
  </p:slideViewPr>
</p:viewPr>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
    )
}

/// `ppt/tableStyles.xml`
pub fn table_styles() -> String {
    format!(
        r#"{}
<a:tblStyleLst xmlns:a="{}" def="{}"/>"#,
        XML_DECLARATION, NS_DRAWING, DEFAULT_TABLE_STYLE_ID
    )
}

/// `ppt/theme/theme1.xml` with the Office palette and fonts
pub fn theme() -> String {
    format!(
        r#"{}
<a:theme xmlns:a="{}" name="{}">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="Office">
      <a:majorFont>
        <a:latin typeface="Calibri Light"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="Calibri"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Office">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
        XML_DECLARATION, NS_DRAWING, APPLICATION_NAME
    )
}

const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// `ppt/slideMasters/slideMaster1.xml`
pub fn slide_master() -> String {
    format!(
        r#"{}
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:bg>
      <p:bgRef idx="1001">
        <a:schemeClr val="bg1"/>
      </p:bgRef>
    </p:bg>
    <p:spTree>{}</p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="{}" r:id="rId1"/>
  </p:sldLayoutIdLst>
  <p:txStyles>
    <p:titleStyle>
      <a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr>
    </p:titleStyle>
    <p:bodyStyle>
      <a:lvl1pPr marL="228600" indent="-228600" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="1000"/></a:spcBef><a:buFont typeface="Arial" panose="020B0604020202020204" pitchFamily="34" charset="0"/><a:buChar char="&#8226;"/><a:defRPr sz="2800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr>
    </p:bodyStyle>
    <p:otherStyle>
      <a:defPPr><a:defRPr lang="en-US"/></a:defPPr>
    </p:otherStyle>
  </p:txStyles>
</p:sldMaster>"#,
        XML_DECLARATION,
        NS_DRAWING,
        NS_RELATIONSHIPS,
        NS_PRESENTATION,
        EMPTY_GROUP,
        SLIDE_LAYOUT_ID
    )
}

/// `ppt/slideMasters/_rels/slideMaster1.xml.rels`
pub fn slide_master_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(
        "rId1",
        REL_TYPE_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    );
    rels.add("rId2", REL_TYPE_THEME, "../theme/theme1.xml");
    rels
}

/// `ppt/slideLayouts/slideLayout1.xml` (blank)
pub fn slide_layout() -> String {
    format!(
        r#"{}
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1">
  <p:cSld name="Blank">
    <p:spTree>{}</p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, EMPTY_GROUP
    )
}

/// `ppt/slideLayouts/_rels/slideLayout1.xml.rels`
pub fn slide_layout_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(
        "rId1",
        REL_TYPE_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    );
    rels
}
