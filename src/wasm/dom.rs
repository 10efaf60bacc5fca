//! Markup generated from the section catalogue.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::config::PageConfig;
use crate::error::PortfolioError;
use crate::section::SectionId;

const CONFIG_ID: &str = "portfolio-config";
const PLACEHOLDER: &str = "임시 텍스트입니다. 포트폴리오 제작 중.";

pub fn element(document: &Document, id: &str) -> Result<Element, PortfolioError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| PortfolioError::MissingElement(id.to_string()))
}

/// Defaults, overridden by the page's JSON config block when present.
pub fn read_config(document: &Document) -> Result<PageConfig, PortfolioError> {
    let Some(block) = document.get_element_by_id(CONFIG_ID) else {
        return Ok(PageConfig::default());
    };
    match block.text_content() {
        Some(json) if !json.trim().is_empty() => PageConfig::from_json(&json),
        _ => Ok(PageConfig::default()),
    }
}

/// One `<li><a href="#slug">LABEL</a></li>` per section.
pub fn build_nav(document: &Document) -> Result<Vec<(SectionId, Element)>, JsValue> {
    let list = element(document, "nav-links")?;
    list.set_inner_html("");
    let mut links = Vec::with_capacity(SectionId::ALL.len());
    for section in SectionId::ALL {
        let item = document.create_element("li")?;
        let link = document.create_element("a")?;
        link.set_attribute("href", &section.anchor())?;
        link.set_text_content(Some(section.label()));
        item.append_child(&link)?;
        list.append_child(&item)?;
        links.push((section, link));
    }
    Ok(links)
}

/// One full-height `<section id="slug">` per section.
pub fn build_sections(document: &Document) -> Result<(), JsValue> {
    let main = element(document, "sections")?;
    main.set_inner_html("");
    for section in SectionId::ALL {
        let region = document.create_element("section")?;
        region.set_id(section.slug());
        region.set_class_name("region");

        let body = document.create_element("div")?;
        let heading = document.create_element("h2")?;
        heading.set_text_content(Some(section.label()));
        let text = document.create_element("p")?;
        text.set_text_content(Some(PLACEHOLDER));

        body.append_child(&heading)?;
        body.append_child(&text)?;
        region.append_child(&body)?;
        main.append_child(&region)?;
    }
    Ok(())
}

pub fn highlight(links: &[(SectionId, Element)], active: SectionId) {
    for (section, link) in links {
        if let Err(err) = link.class_list().toggle_with_force("active", *section == active) {
            log::warn!("could not mark nav link {section}: {err:?}");
        }
    }
}
