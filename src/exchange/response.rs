/// Write-only view of the outbound HTTP response.
///
/// Implemented by the hosting transport. The pipeline writes status, headers,
/// and body through this trait; headers must be set before the first body
/// write reaches the wire.
pub trait HttpResponse {
    /// Currently set status code.
    fn status(&self) -> u16;

    /// Set the response status code.
    fn set_status(&mut self, status: u16);

    /// Add or replace a response header.
    fn set_header(&mut self, name: &str, value: &str);

    /// Append bytes to the response body.
    fn write_body(&mut self, bytes: &[u8]);
}
