// Absolute image URLs from TMDB relative paths

use super::models::{ImageRole, ImageSet, ImageSize};
use crate::tmdb_client::TmdbConfiguration;

/// TMDB size token for a size label. The configuration publishes per-role size
/// lists, but one table is used for every role.
pub fn size_token(size: ImageSize) -> &'static str {
    match size {
        ImageSize::Xsmall => "w100",
        ImageSize::Small => "w300",
        ImageSize::Medium => "w500",
        ImageSize::Large => "w700",
        ImageSize::Xlarge => "w1000",
        ImageSize::Original => "original",
    }
}

pub fn image_url(base_url: &str, size: ImageSize, relative_path: &str) -> String {
    format!("{}{}{}", base_url, size_token(size), relative_path)
}

/// Build every role/size URL for `relative_path`. A missing or empty path gives
/// an `ImageSet` whose roles are all empty.
pub fn build_images(relative_path: Option<&str>, configuration: &TmdbConfiguration) -> ImageSet {
    let mut images = ImageSet::default();
    let Some(path) = relative_path.filter(|p| !p.is_empty()) else {
        return images;
    };

    let base_url = configuration.image_base_url();
    for role in ImageRole::ALL {
        let sized = images.role_mut(role);
        for size in ImageSize::ALL {
            sized.insert(size, image_url(base_url, size, path));
        }
    }
    images
}
