//! One-time reference data seeding.
//!
//! Populates the artwork catalog and the default settings row the first
//! time the database is initialized. Subsequent opens find the rows
//! already present and leave them untouched.

use rusqlite::{params, Connection};

use crate::model::{Artwork, Settings};

/// Fixed key of the singleton settings row.
pub const SETTINGS_KEY: &str = "user_settings";

/// Populate reference artworks and the default settings row if missing.
///
/// # Errors
/// Returns an error if any insert fails; the whole seed rolls back.
pub fn seed(conn: &Connection) -> Result<(), rusqlite::Error> {
    let tx = conn.unchecked_transaction()?;

    let artwork_count: i64 = tx.query_row("SELECT COUNT(*) FROM artworks", [], |row| row.get(0))?;
    if artwork_count == 0 {
        for artwork in initial_artworks() {
            insert_artwork(&tx, &artwork)?;
        }
    }

    let settings_count: i64 = tx.query_row(
        "SELECT COUNT(*) FROM settings WHERE key = ?1",
        params![SETTINGS_KEY],
        |row| row.get(0),
    )?;
    if settings_count == 0 {
        let value = serde_json::to_string(&Settings::default())
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        tx.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)",
            params![SETTINGS_KEY, value],
        )?;
    }

    tx.commit()
}

fn insert_artwork(conn: &Connection, artwork: &Artwork) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO artworks (id, artist, artist_en, title, title_en, era, image_path, source_url, min_grid, year)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            artwork.id,
            artwork.artist,
            artwork.artist_en,
            artwork.title,
            artwork.title_en,
            artwork.era,
            artwork.image_path,
            artwork.source_url,
            artwork.min_grid,
            artwork.year,
        ],
    )?;
    for genre in &artwork.genres {
        // OR IGNORE keeps set semantics if a tag appears twice.
        conn.execute(
            "INSERT OR IGNORE INTO artwork_genres (artwork_id, genre) VALUES (?1, ?2)",
            params![artwork.id, genre],
        )?;
    }
    Ok(())
}

fn art(
    id: &str,
    artist: &str,
    artist_en: &str,
    title: &str,
    title_en: &str,
    genres: &[&str],
    era: &str,
    image_path: &str,
    source_url: &str,
    min_grid: u32,
    year: i32,
) -> Artwork {
    Artwork {
        id: id.into(),
        artist: artist.into(),
        artist_en: artist_en.into(),
        title: title.into(),
        title_en: title_en.into(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        era: era.into(),
        image_path: image_path.into(),
        source_url: source_url.into(),
        min_grid,
        year,
    }
}

/// The built-in public-domain catalog.
fn initial_artworks() -> Vec<Artwork> {
    vec![
        art(
            "hokusai-great-wave",
            "葛飾北斎",
            "Katsushika Hokusai",
            "神奈川沖浪裏",
            "The Great Wave off Kanagawa",
            &["浮世絵", "風景画"],
            "江戸時代",
            "/images/hokusai-great-wave.jpg",
            "https://commons.wikimedia.org/wiki/File:Tsunami_by_hokusai_19th_century.jpg",
            5,
            1831,
        ),
        art(
            "hiroshige-ohashi",
            "歌川広重",
            "Utagawa Hiroshige",
            "大はしあたけの夕立",
            "Sudden Shower over Shin-Ohashi Bridge",
            &["浮世絵", "風景画"],
            "江戸時代",
            "/images/hiroshige-ohashi.jpg",
            "https://commons.wikimedia.org/wiki/File:Hiroshige_Atake_sous_une_averse_soudaine.jpg",
            5,
            1857,
        ),
        art(
            "sharaku-otani-oniji",
            "東洲斎写楽",
            "Toshusai Sharaku",
            "三代目大谷鬼次の奴江戸兵衛",
            "Otani Oniji III as Yakko Edobei",
            &["浮世絵", "役者絵"],
            "江戸時代",
            "/images/sharaku-otani-oniji.jpg",
            "https://commons.wikimedia.org/wiki/File:Toshusai_Sharaku-_Otani_Oniji,_1794.jpg",
            8,
            1794,
        ),
        art(
            "korin-irises",
            "尾形光琳",
            "Ogata Korin",
            "燕子花図",
            "Irises",
            &["琳派", "花鳥画"],
            "江戸時代",
            "/images/korin-irises.jpg",
            "https://commons.wikimedia.org/wiki/File:Irises_screen_1.jpg",
            5,
            1701,
        ),
        art(
            "vermeer-pearl-earring",
            "ヨハネス・フェルメール",
            "Johannes Vermeer",
            "真珠の耳飾りの少女",
            "Girl with a Pearl Earring",
            &["油彩画", "肖像画"],
            "バロック",
            "/images/vermeer-pearl-earring.jpg",
            "https://commons.wikimedia.org/wiki/File:1665_Girl_with_a_Pearl_Earring.jpg",
            8,
            1665,
        ),
        art(
            "gogh-starry-night",
            "フィンセント・ファン・ゴッホ",
            "Vincent van Gogh",
            "星月夜",
            "The Starry Night",
            &["油彩画", "風景画"],
            "ポスト印象派",
            "/images/gogh-starry-night.jpg",
            "https://commons.wikimedia.org/wiki/File:Van_Gogh_-_Starry_Night.jpg",
            8,
            1889,
        ),
    ]
}
