use crate::error::ConfigError;

/// A compression tool driven through the shell.
pub trait Compressor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Extension appended to compressed artifacts, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Command that compresses `from` (`-` for stdin) into `to`.
    fn compress(&self, from: &str, to: &str) -> String;

    /// Command that replaces `path` with its decompressed form (`path` minus the extension).
    fn decompress(&self, path: &str) -> String;
}

pub struct Gzip;

impl Compressor for Gzip {
    fn name(&self) -> &'static str { "gzip" }

    fn file_extension(&self) -> &'static str { "gz" }

    fn compress(&self, from: &str, to: &str) -> String {
        format!("gzip {} > {}", from, to)
    }

    fn decompress(&self, path: &str) -> String {
        format!("gzip -d -f {}", path)
    }
}

pub struct Bzip2;

impl Compressor for Bzip2 {
    fn name(&self) -> &'static str { "bzip2" }

    fn file_extension(&self) -> &'static str { "bz2" }

    fn compress(&self, from: &str, to: &str) -> String {
        format!("bzip2 {} > {}", from, to)
    }

    fn decompress(&self, path: &str) -> String {
        format!("bunzip2 -f {}", path)
    }
}

pub struct Zstd;

impl Compressor for Zstd {
    fn name(&self) -> &'static str { "zstd" }

    fn file_extension(&self) -> &'static str { "zst" }

    fn compress(&self, from: &str, to: &str) -> String {
        format!("zstd -q -c {} > {}", from, to)
    }

    fn decompress(&self, path: &str) -> String {
        format!("zstd -d -f -q --rm {}", path)
    }
}

static KNOWN: [&dyn Compressor; 3] = [&Gzip, &Bzip2, &Zstd];

pub fn known_compressors() -> &'static [&'static dyn Compressor] {
    &KNOWN
}

/// Look up a compressor by name. `Gzip`, `gzip` and `GZIP` all resolve to the same entry;
/// underscores are ignored so camel-cased and snake_cased names agree.
pub fn resolve_compressor(name: &str) -> Result<&'static dyn Compressor, ConfigError> {
    let wanted: String = name.chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase();
    KNOWN
        .iter()
        .copied()
        .find(|c| c.name() == wanted)
        .ok_or_else(|| ConfigError::UnknownCompressor {
            name: name.to_string(),
            known: KNOWN.iter().map(|c| c.name()).collect::<Vec<_>>().join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_case_insensitively() {
        assert_eq!(resolve_compressor("gzip").unwrap().file_extension(), "gz");
        assert_eq!(resolve_compressor("Gzip").unwrap().name(), "gzip");
        assert_eq!(resolve_compressor("BZIP2").unwrap().file_extension(), "bz2");
        assert_eq!(resolve_compressor("zstd").unwrap().file_extension(), "zst");
    }

    #[test]
    fn unknown_name_lists_known_compressors() {
        let err = match resolve_compressor("lzma") {
            Err(err) => err.to_string(),
            Ok(_) => panic!("lzma should not resolve"),
        };
        assert!(err.contains("lzma"));
        assert!(err.contains("gzip, bzip2, zstd"));
    }

    #[test]
    fn gzip_commands() {
        assert_eq!(Gzip.compress("-", "db/app_1.sql.gz"), "gzip - > db/app_1.sql.gz");
        assert_eq!(Gzip.decompress("db/app_1.sql.gz"), "gzip -d -f db/app_1.sql.gz");
    }

    #[test]
    fn bzip2_decompresses_in_place() {
        assert_eq!(Bzip2.decompress("db/app_1.sql.bz2"), "bunzip2 -f db/app_1.sql.bz2");
    }
}
