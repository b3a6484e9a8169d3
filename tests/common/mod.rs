// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use chumweb::Config;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

pub const AARCH64: &str = "4.5.0.24_aarch64";
pub const I486: &str = "4.5.0.24_i486";

/// One `<package>` of a primary index
pub struct Pkg<'a> {
    pub name: &'a str,
    pub arch: &'a str,
    pub ver: &'a str,
    pub time: u64,
    pub size: u64,
    pub description: &'a str,
}

impl<'a> Pkg<'a> {
    pub fn new(name: &'a str, arch: &'a str) -> Self {
        Self {
            name,
            arch,
            ver: "1.0",
            time: 1_700_000_000,
            size: 1000,
            description: "",
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = description;
        self
    }

    pub fn time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    fn to_xml(&self) -> String {
        format!(
            r#"<package type="rpm">
  <name>{name}</name>
  <arch>{arch}</arch>
  <version epoch="0" ver="{ver}" rel="1"/>
  <checksum type="sha256" pkgid="YES">{name}-{arch}-sum</checksum>
  <summary>Summary of {name}</summary>
  <description><![CDATA[{description}]]></description>
  <url>https://example.org/{name}</url>
  <time file="{time}" build="{time}"/>
  <size package="{size}" installed="{installed}" archive="{installed}"/>
  <location href="{arch}/{name}-{ver}-1.{arch}.rpm"/>
  <format>
    <rpm:license>MIT</rpm:license>
  </format>
</package>
"#,
            name = self.name,
            arch = self.arch,
            ver = self.ver,
            time = self.time,
            size = self.size,
            installed = self.size * 3,
            description = self.description,
        )
    }
}

pub fn gzip(content: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// A complete `primary.xml` document
pub fn primary_xml(packages: &[Pkg<'_>]) -> String {
    let body: String = packages.iter().map(Pkg::to_xml).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="{}">
{}</metadata>
"#,
        packages.len(),
        body
    )
}

/// A complete `other.xml` document, one changelog entry per package
pub fn other_xml(changelogs: &[(&str, &str)]) -> String {
    let body: String = changelogs
        .iter()
        .map(|(name, text)| {
            format!(
                r#"<package pkgid="x" name="{name}" arch="noarch">
  <version epoch="0" ver="1.0" rel="1"/>
  <changelog author="Jane Doe &lt;jane@example.org&gt; - 1.0-1" date="1690000000">{text}</changelog>
</package>
"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<otherdata xmlns="http://linux.duke.edu/metadata/other" packages="{}">
{}</otherdata>
"#,
        changelogs.len(),
        body
    )
}

/// A `repomd.xml` advertising `(type, href)` pairs
pub fn repomd_xml(locations: &[(&str, &str)]) -> String {
    let body: String = locations
        .iter()
        .map(|(kind, href)| {
            format!("  <data type=\"{kind}\">\n    <location href=\"{href}\"/>\n  </data>\n")
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<repomd xmlns=\"http://linux.duke.edu/metadata/repo\">\n{body}</repomd>\n"
    )
}

/// Write `{repo}-primary.xml.gz` into `dir`
pub fn write_primary(dir: &Path, repo: &str, packages: &[Pkg<'_>]) {
    fs::write(dir.join(format!("{repo}-primary.xml.gz")), gzip(&primary_xml(packages))).unwrap();
}

/// Write `{repo}-other.xml.gz` into `dir`
pub fn write_other(dir: &Path, repo: &str, changelogs: &[(&str, &str)]) {
    fs::write(dir.join(format!("{repo}-other.xml.gz")), gzip(&other_xml(changelogs))).unwrap();
}

/// Minimal HTTP/1.1 server answering GET requests from a fixed route table
///
/// Every connection serves one request and is closed. Unknown paths get a
/// 404. The request heads are kept for inspection.
pub struct TestServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Serve `(path, status, body)` routes on an ephemeral local port
    pub fn start(routes: Vec<(String, u16, Vec<u8>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let head = read_request_head(&mut stream);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen.lock().unwrap().push(head);

                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, body.clone()))
                    .unwrap_or((404, b"not found".to_vec()));
                let reason = if status == 200 { "OK" } else { "Error" };
                let header = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(&body);
            }
        });

        Self { url, requests }
    }

    /// Request heads received so far, lower-cased
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|head| head.to_lowercase())
            .collect()
    }
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(1) => head.push(byte[0]),
            _ => break,
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Config reading indexes from `data_dir` and writing below `work`, offline
pub fn offline_config(work: &TempDir, data_dir: &Path, repos: &[&str]) -> Config {
    let out_dir = work.path().join("out");
    Config {
        repos: repos.iter().map(|repo| repo.to_string()).collect(),
        repo_data_dir: Some(data_dir.to_path_buf()),
        download_extra_metadata: false,
        public_url: "https://chum.example.org/".to_string(),
        repo_url_prefix: "https://repo.example.org/chum/".to_string(),
        job_summary: out_dir.join("summary.md"),
        out_dir,
        ..Config::default()
    }
}

pub const FOO_DESCRIPTION: &str = "Foo does things.

Title: Foo Deluxe
Type: desktop-application
Icon: https://example.org/foo.png
Categories:
  - Game
PackagedBy: Packager Pete
Links:
  Homepage: https://example.org/foo";

/// Two architectures with an app, its debug package and a noarch library
pub fn write_two_arch_fixture(dir: &Path) {
    write_primary(
        dir,
        AARCH64,
        &[
            Pkg::new("harbour-foo", "aarch64").description(FOO_DESCRIPTION),
            Pkg::new("harbour-foo-debuginfo", "aarch64"),
            Pkg::new("libbar", "noarch")
                .description("Bar library.")
                .time(1_650_000_000),
        ],
    );
    write_other(
        dir,
        AARCH64,
        &[("harbour-foo", "- Initial release"), ("ghost", "- Never built")],
    );
    write_primary(
        dir,
        I486,
        &[
            Pkg::new("harbour-foo", "i486").description("Different description"),
            Pkg::new("harbour-foo-debuginfo", "i486"),
            Pkg::new("libbar", "noarch"),
        ],
    );
}
