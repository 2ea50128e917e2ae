// System endpoints: server report and system log.

use tracing::debug;

use crate::client::VapixClient;
use crate::error::Error;
use crate::parse::{ServerReport, parse_server_report};
use crate::request::Request;

impl VapixClient {
    /// Fetch and split the diagnostic server report.
    ///
    /// `GET admin/serverreport.cgi`
    pub fn server_report(&self) -> Result<ServerReport, Error> {
        debug!("fetching server report");
        let text = self.text(&Request::cgi("admin", "serverreport"))?;
        Ok(parse_server_report(&text))
    }

    /// Fetch the system log as plain text.
    ///
    /// `GET admin/systemlog.cgi`
    pub fn system_log(&self) -> Result<String, Error> {
        debug!("fetching system log");
        self.text(&Request::cgi("admin", "systemlog"))
    }
}
