use serde::Serialize;

use crate::detect::catalog::{
    ANALYTICS, BUILD_TOOLS, CDNS, CSS_FRAMEWORKS, JS_FRAMEWORKS, STATE_MANAGEMENT, TEST_FRAMEWORKS,
    UI_LIBRARIES,
};
use crate::detect::{extend_unique, Matcher};
use crate::snapshot::PageSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrontendReport {
    pub javascript_frameworks: Vec<String>,
    pub css_frameworks: Vec<String>,
    pub ui_libraries: Vec<String>,
    pub build_tools: Vec<String>,
    pub state_management: Vec<String>,
    pub testing_frameworks: Vec<String>,
    pub analytics_tools: Vec<String>,
    pub cdn_libraries: Vec<String>,
}

impl FrontendReport {
    pub fn analyze(page: &PageSnapshot, matcher: &dyn Matcher) -> Self {
        let mut report = FrontendReport::default();
        let doc = &page.document;

        for script in &doc.scripts {
            if let Some(src) = script.src.as_deref() {
                extend_unique(&mut report.javascript_frameworks, matcher.match_category(src, JS_FRAMEWORKS));
                extend_unique(&mut report.cdn_libraries, matcher.match_category(src, CDNS));
            }
            if let Some(content) = script.content.as_deref() {
                extend_unique(&mut report.state_management, matcher.match_category(content, STATE_MANAGEMENT));
                extend_unique(&mut report.build_tools, matcher.match_category(content, BUILD_TOOLS));
            }
        }

        for href in &doc.stylesheets {
            extend_unique(&mut report.css_frameworks, matcher.match_category(href, CSS_FRAMEWORKS));
        }

        let html = doc.html.as_str();
        extend_unique(&mut report.ui_libraries, matcher.match_category(html, UI_LIBRARIES));
        extend_unique(&mut report.analytics_tools, matcher.match_category(html, ANALYTICS));
        extend_unique(&mut report.testing_frameworks, matcher.match_category(html, TEST_FRAMEWORKS));

        report
    }
}
