use xray_api::XrayClient;
use xray_output::OutputRenderer;

pub mod auth;
pub mod issues;
pub mod results;
pub mod runs;

pub struct XrayContext<'a> {
    pub client: XrayClient,
    pub renderer: &'a OutputRenderer,
}
