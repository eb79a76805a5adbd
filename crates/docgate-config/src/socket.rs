use std::fmt;
use std::fs::DirBuilder;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Where the daemon listens and the CLI connects.
///
/// Written as `unix:///run/user/1000/docgate/docgated.sock` or
/// `tcp://127.0.0.1:9780`. Configuration files may also use a table:
/// `{ transport = "tcp", host = "127.0.0.1", port = 9780 }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum SocketEndpoint {
    /// Unix domain socket endpoint.
    Unix { path: Utf8PathBuf },
    /// TCP socket endpoint.
    Tcp { host: String, port: u16 },
}

impl SocketEndpoint {
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Socket file path, for Unix endpoints only.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Unix { path } => Some(path.as_ref()),
            Self::Tcp { .. } => None,
        }
    }

    /// Creates the directory that will hold a Unix socket.
    ///
    /// New directories are owner-only (`0700`). TCP endpoints need nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SocketPreparationError`] when the path has no parent or the
    /// directory cannot be created.
    pub fn prepare_filesystem(&self) -> Result<(), SocketPreparationError> {
        let Some(path) = self.unix_path() else {
            return Ok(());
        };
        let directory = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .ok_or_else(|| SocketPreparationError::NoParent(path.to_owned()))?;
        if directory.is_dir() {
            return Ok(());
        }

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        std::os::unix::fs::DirBuilderExt::mode(&mut builder, 0o700);
        builder
            .create(directory)
            .map_err(|source| SocketPreparationError::CreateDirectory {
                directory: directory.to_owned(),
                source,
            })
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix { path } => write!(f, "unix://{path}"),
            Self::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
        }
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input).map_err(|source| SocketParseError::Url {
            input: input.to_owned(),
            source,
        })?;
        let incomplete = |missing| SocketParseError::Incomplete {
            input: input.to_owned(),
            missing,
        };
        match url.scheme() {
            "unix" if url.path().is_empty() => Err(incomplete("socket path")),
            "unix" => Ok(Self::unix(url.path())),
            "tcp" => {
                let host = url.host_str().ok_or_else(|| incomplete("host"))?;
                let port = url.port().ok_or_else(|| incomplete("port"))?;
                Ok(Self::tcp(host, port))
            }
            scheme => Err(SocketParseError::Scheme {
                input: input.to_owned(),
                scheme: scheme.to_owned(),
            }),
        }
    }
}

/// Accepted spellings: a URL string or a tagged table.
#[derive(Deserialize)]
#[serde(untagged)]
enum Spelling {
    Url(String),
    Table(Table),
}

#[derive(Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
enum Table {
    Unix { path: Utf8PathBuf },
    Tcp { host: String, port: u16 },
}

impl<'de> Deserialize<'de> for SocketEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Spelling::deserialize(deserializer)? {
            Spelling::Url(text) => text.parse().map_err(de::Error::custom)?,
            Spelling::Table(Table::Unix { path }) => Self::Unix { path },
            Spelling::Table(Table::Tcp { host, port }) => Self::Tcp { host, port },
        })
    }
}

/// Reasons a socket URL is rejected.
#[derive(Debug, Error)]
pub enum SocketParseError {
    /// The text is not a URL.
    #[error("'{input}' is not a socket URL: {source}")]
    Url {
        input: String,
        #[source]
        source: url::ParseError,
    },
    /// Only `unix` and `tcp` are understood.
    #[error("'{input}' uses unsupported scheme '{scheme}', expected unix or tcp")]
    Scheme { input: String, scheme: String },
    /// A required URL component is absent.
    #[error("'{input}' has no {missing}")]
    Incomplete { input: String, missing: &'static str },
}

/// Failures creating the socket's directory.
#[derive(Debug, Error)]
pub enum SocketPreparationError {
    /// The socket path is a bare file name.
    #[error("socket path '{0}' has no parent directory")]
    NoParent(Utf8PathBuf),
    /// The directory could not be created.
    #[error("cannot create socket directory '{directory}': {source}")]
    CreateDirectory {
        directory: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn display_unix_socket() {
        let endpoint = SocketEndpoint::unix(Utf8PathBuf::from("/tmp/docgate.sock"));
        assert_eq!(endpoint.to_string(), "unix:///tmp/docgate.sock");
    }

    #[test]
    fn parse_tcp_socket() {
        let endpoint: SocketEndpoint = "tcp://127.0.0.1:9000".parse().expect("parse tcp");
        assert!(matches!(endpoint, SocketEndpoint::Tcp { port: 9000, .. }));
    }

    #[rstest]
    #[case("http://localhost:80", "unsupported scheme 'http'")]
    #[case("tcp://127.0.0.1", "has no port")]
    #[case("not a url", "is not a socket URL")]
    fn rejects_unusable_endpoints(#[case] input: &str, #[case] expected: &str) {
        let error = input.parse::<SocketEndpoint>().expect_err("endpoint rejected");
        assert!(error.to_string().contains(expected), "{error}");
    }

    #[test]
    fn bare_file_names_have_no_directory() {
        let error = SocketEndpoint::unix("docgated.sock")
            .prepare_filesystem()
            .expect_err("bare name rejected");
        assert!(matches!(error, SocketPreparationError::NoParent(_)));
    }

    #[test]
    fn deserialises_url_form() {
        let endpoint: SocketEndpoint =
            serde_json::from_str(r#""tcp://localhost:9780""#).expect("decode url form");
        assert_eq!(endpoint, SocketEndpoint::tcp("localhost", 9780));
    }

    #[test]
    fn deserialises_table_form() {
        let endpoint: SocketEndpoint =
            serde_json::from_str(r#"{"transport":"unix","path":"/run/docgate.sock"}"#)
                .expect("decode table form");
        assert_eq!(endpoint, SocketEndpoint::unix("/run/docgate.sock"));
    }

    #[test]
    fn prepare_filesystem_creates_parent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let socket = dir.path().join("nested").join("docgated.sock");
        let endpoint = SocketEndpoint::unix(socket.to_str().expect("utf8 path"));
        endpoint.prepare_filesystem().expect("prepare socket directory");
        assert!(dir.path().join("nested").is_dir());
    }
}
