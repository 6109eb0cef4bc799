//! `jmdl dir` – evaluate the dir rule against entities given on the command line.

use anyhow::{Context, Result};
use jmdl_core::entity::{Album, Photo};
use jmdl_core::option::JmOption;
use std::sync::Arc;

/// Parses a `KEY=VALUE` argument.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn build_album(fields: &[(String, String)]) -> Result<Album> {
    let mut album = Album::default();
    for (key, value) in fields {
        match key.as_str() {
            "id" => album.id = value.clone(),
            "title" | "name" => album.title = value.clone(),
            "author" | "authors" => album.authors.push(value.clone()),
            "tag" | "tags" => album.tags.push(value.clone()),
            "page_count" => {
                album.page_count = value
                    .parse()
                    .with_context(|| format!("album page_count `{}`", value))?
            }
            "pub_date" => album.pub_date = value.clone(),
            "update_date" => album.update_date = value.clone(),
            _ => {
                album.extra.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(album)
}

fn build_photo(fields: &[(String, String)], album: Option<Album>) -> Result<Photo> {
    let mut photo = Photo::default();
    for (key, value) in fields {
        match key.as_str() {
            "id" => photo.id = value.clone(),
            "title" | "name" => photo.title = value.clone(),
            "index" | "sort" => {
                photo.index = value
                    .parse()
                    .with_context(|| format!("photo index `{}`", value))?
            }
            "scramble_id" => {
                photo.scramble_id = value
                    .parse()
                    .with_context(|| format!("photo scramble_id `{}`", value))?
            }
            _ => {
                photo.extra.insert(key.clone(), value.clone());
            }
        }
    }
    photo.album = album.map(Arc::new);
    Ok(photo)
}

/// Computes the save directory without creating it.
fn preview_dir(option: &JmOption, album: &[(String, String)], photo: &[(String, String)]) -> Result<String> {
    let album = if album.is_empty() {
        None
    } else {
        Some(build_album(album)?)
    };
    let photo = build_photo(photo, album)?;
    let dir = option.dir_rule().decide_image_save_dir(photo.album(), &photo)?;
    Ok(dir)
}

pub fn run_dir(option: &JmOption, album: &[(String, String)], photo: &[(String, String)]) -> Result<()> {
    println!("{}", preview_dir(option, album, photo)?);
    Ok(())
}
