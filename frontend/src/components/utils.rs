use gloo_file::File as GlooFile;
use web_sys::FileList;

/// First `image/*` entry of a file list; other files are skipped with a warning.
pub fn first_image(file_list: &FileList) -> Option<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| {
            let is_image = file.type_().starts_with("image/");
            if !is_image {
                log::warn!("Skipping non-image file: {}", file.name());
            }
            is_image
        })
        .map(GlooFile::from)
}

pub fn display_name(filename: &str) -> String {
    if filename.chars().count() > 20 {
        let head: String = filename.chars().take(17).collect();
        format!("{}...", head)
    } else {
        filename.to_string()
    }
}
