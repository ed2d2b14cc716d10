use snafu::Snafu;

/// Errors of handing a URL to the desktop's URL opener.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The opener program could not be started, usually because it is not
    /// installed.
    #[snafu(display("Failed to run {program} to open {url}, error: {source}"))]
    SpawnOpener { program: &'static str, url: String, source: std::io::Error },

    #[snafu(display("{program} could not open {url}, exit status: {status}"))]
    OpenerFailed { program: &'static str, url: String, status: std::process::ExitStatus },
}
