use crc32fast::Hasher;

/// Generate a stable document ID from a file path using CRC32
pub fn get_document_id(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for selector spans within a document
#[derive(Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: get_document_id(path),
            count: 0,
        }
    }

    /// Generate the next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_is_stable() {
        assert_eq!(get_document_id("/a.scss"), get_document_id("/a.scss"));
        assert_ne!(get_document_id("/a.scss"), get_document_id("/b.scss"));
    }

    #[test]
    fn test_sequential_ids_share_seed() {
        let mut gen = IdGenerator::new("/test.scss");
        let id1 = gen.new_id();
        let id2 = gen.new_id();
        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id2.starts_with(gen.seed()));
    }
}
