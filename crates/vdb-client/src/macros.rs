//! Source-location helpers

/// Draw a point tagged with the `file:line` of the call site.
///
/// Attaches a named-line label for the call site, then draws the point.
/// `$vdb` is a place expression (a `Vdb` or `&mut Vdb` binding); it is
/// evaluated once per call it makes.
///
/// ```no_run
/// # fn main() -> vdb_client::VdbResult<()> {
/// let mut vdb = vdb_client::Vdb::new()?;
/// vdb_client::vdb_point!(vdb, 1.0, 2.0, 3.0)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! vdb_point {
    ($vdb:expr, $x:expr, $y:expr, $z:expr) => {
        match $vdb.line_label(::core::concat!(::core::file!(), ":", ::core::line!())) {
            Ok(()) => $vdb.point($x, $y, $z),
            Err(e) => Err(e),
        }
    };
}
