use std::fmt::Write as _;

use mediadesk_core::actions::SET_NETWORK;
use mediadesk_model::{Page, Work};
use serde::Serialize;
use url::form_urlencoded;

use super::escape;

pub const VIEW_NAME: &str = "works/works";

#[derive(Debug, Clone, Serialize)]
pub struct WorksModel {
    pub page: Page<Work>,
    pub search: Option<String>,
    pub networks: Vec<String>,
}

fn page_link(search: Option<&str>, page: u32, size: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(search) = search {
        query.append_pair("search", search);
    }
    query.append_pair("page", &page.to_string());
    query.append_pair("size", &size.to_string());
    format!("/works?{}", query.finish())
}

pub fn render(model: &WorksModel) -> String {
    let page = &model.page;
    let search = model.search.as_deref();
    let mut html = String::with_capacity(4096);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Works</title>\n</head>\n",
    );
    let _ = writeln!(html, "<body data-view=\"{VIEW_NAME}\">\n<h1>Works</h1>");

    let _ = writeln!(
        html,
        "<form method=\"get\" action=\"/works\">\n\
         <input type=\"search\" name=\"search\" value=\"{}\" \
         placeholder=\"term, title:, hostId:, id:, collection:\">\n\
         <button type=\"submit\">Search</button>\n</form>",
        escape(search.unwrap_or_default())
    );

    html.push_str("<form method=\"post\" action=\"/works\">\n<table>\n<thead><tr>");
    html.push_str(
        "<th></th><th>Id</th><th>Title</th><th>Host id</th><th>Network</th>\
         <th>Collections</th><th>Indexed</th>",
    );
    html.push_str("</tr></thead>\n<tbody>\n");

    if page.content.is_empty() {
        html.push_str("<tr><td colspan=\"7\">No works found.</td></tr>\n");
    }
    for work in &page.content {
        let id = escape(work.id.as_str());
        let collections = work
            .collection_ids()
            .map(escape)
            .collect::<Vec<_>>()
            .join(", ");
        let indexed = work
            .index_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<tr><td><input type=\"checkbox\" name=\"workIds\" value=\"{id}\"></td>\
             <td>{id}</td><td>{}</td><td>{}</td><td>{}</td><td>{collections}</td><td>{indexed}</td></tr>",
            escape(&work.title),
            escape(work.host_id.as_deref().unwrap_or_default()),
            escape(&work.allowed_network),
        );
    }
    html.push_str("</tbody>\n</table>\n");

    let _ = writeln!(
        html,
        "<fieldset>\n<legend>Change network</legend>\n\
         <input type=\"hidden\" name=\"action\" value=\"{SET_NETWORK}\">\n\
         <select name=\"params[network]\">"
    );
    for network in &model.networks {
        let network = escape(network);
        let _ = writeln!(html, "<option value=\"{network}\">{network}</option>");
    }
    html.push_str(
        "</select>\n\
         <input type=\"text\" name=\"params[comment]\" placeholder=\"Comment\">\n\
         <label><input type=\"checkbox\" name=\"params[reduce]\" value=\"true\"> Reduce</label>\n\
         <button type=\"submit\">Apply</button>\n</fieldset>\n</form>\n",
    );

    html.push_str("<nav>");
    if page.has_previous() {
        let _ = write!(
            html,
            "<a rel=\"prev\" href=\"{}\">Previous</a> ",
            escape(&page_link(search, page.number - 1, page.size))
        );
    }
    let _ = write!(
        html,
        "Page {} of {} ({} works)",
        page.number.saturating_add(1),
        page.total_pages.max(1),
        page.total_elements
    );
    if page.has_next() {
        let _ = write!(
            html,
            " <a rel=\"next\" href=\"{}\">Next</a>",
            escape(&page_link(search, page.number + 1, page.size))
        );
    }
    html.push_str("</nav>\n</body>\n</html>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadesk_model::{PageRequest, WorkId};

    fn model(works: Vec<Work>, request: PageRequest, total: u64) -> WorksModel {
        WorksModel {
            page: Page::new(works, request, total),
            search: Some("a&b".into()),
            networks: vec!["global".into(), "disabled".into()],
        }
    }

    #[test]
    fn rows_are_escaped() {
        let work = Work::new(WorkId::new("w<1>").unwrap(), "Tom & Jerry");
        let html = render(&model(vec![work], PageRequest::first(20), 1));
        assert!(html.contains("value=\"w&lt;1&gt;\""));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("value=\"a&amp;b\""));
        assert!(html.contains("<option value=\"disabled\">disabled</option>"));
    }

    #[test]
    fn paging_links_keep_the_search() {
        let html = render(&model(Vec::new(), PageRequest::new(1, 10), 35));
        assert!(html.contains("Page 2 of 4 (35 works)"));
        assert!(html.contains("href=\"/works?search=a%26b&amp;page=0&amp;size=10\""));
        assert!(html.contains("href=\"/works?search=a%26b&amp;page=2&amp;size=10\""));
    }

    #[test]
    fn last_possible_page_number_renders() {
        let html = render(&model(Vec::new(), PageRequest::new(u32::MAX, 10), 35));
        assert!(html.contains(&format!("Page {} of 4 (35 works)", u32::MAX)));
        assert!(html.contains("rel=\"prev\""));
        assert!(!html.contains("rel=\"next\""));
    }
}
