use tiny_http::{Header, Response, Server};

use crate::chart::render_svg;
use crate::palette::Palette;
use crate::query::parse_query;

/// Render the chart for a request URL. Any path is served identically;
/// only the query string matters.
fn chart_response(url: &str, palette: &Palette) -> String {
    let query = url.split_once('?').map(|(_, query)| query).unwrap_or("");
    let (values, options) = parse_query(query);
    render_svg(&values, &options, palette)
}

/// Serve sparkline charts until the process is terminated. One request,
/// one pure render, one response; no state is carried between requests.
pub fn serve(addr: &str, palette: Palette) -> Result<(), String> {
    let server =
        Server::http(addr).map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
    let content_type: Header = "Content-Type: image/svg+xml"
        .parse()
        .map_err(|_| "Invalid Content-Type header".to_string())?;
    let cache_control: Header = "Cache-Control: no-store"
        .parse()
        .map_err(|_| "Invalid Cache-Control header".to_string())?;

    eprintln!("Serving sparklines on http://{}", addr);

    for request in server.incoming_requests() {
        eprintln!("{} {}", request.method(), request.url());
        let svg = chart_response(request.url(), &palette);
        let response = Response::from_string(svg)
            .with_header(content_type.clone())
            .with_header(cache_control.clone());
        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::chart_response;
    use crate::palette::Palette;

    #[test]
    fn query_string_drives_the_render() {
        let svg = chart_response("/chart?values=200&maxValue=100", &Palette::default());
        assert!(svg.contains(r##"fill="#196127""##));
        assert!(svg.contains(r#"height="15""#));
    }

    #[test]
    fn path_without_query_renders_empty_canvas() {
        let svg = chart_response("/", &Palette::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn path_is_irrelevant() {
        let a = chart_response("/chart?values=1,2,3", &Palette::default());
        let b = chart_response("/anything/else?values=1,2,3", &Palette::default());
        assert_eq!(a, b);
    }
}
