use crate::Error;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::Read;

/// Decompresses every file of a zipped feed
///
/// Entries are keyed by their file name, so a feed zipped with its enclosing
/// directory (`gtfs/routes.txt`) still exposes `routes.txt`. When two entries
/// share a file name, the first one in the archive wins.
pub fn extract_entries(raw: &[u8]) -> Result<HashMap<String, Bytes>, Error> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(raw))?;
    let mut entries = HashMap::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut archive_file = archive.by_index(i)?;
        if archive_file.is_dir() {
            continue;
        }
        let file_name = match std::path::Path::new(archive_file.name())
            .file_name()
            .and_then(|f| f.to_str())
        {
            Some(f) => f.to_owned(),
            None => continue,
        };
        if entries.contains_key(&file_name) {
            continue;
        }
        let mut content = Vec::with_capacity(archive_file.size() as usize);
        archive_file
            .read_to_end(&mut content)
            .map_err(|e| Error::NamedFileIO {
                file_name: file_name.clone(),
                source: e,
            })?;
        entries.insert(file_name, Bytes::from(content));
    }

    Ok(entries)
}

#[cfg(test)]
pub(crate) fn zip_files(files: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
