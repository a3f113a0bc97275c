//! # Canonical Ingredient Names
//!
//! Lookup tables that fold declined or variant Serbian spellings into one
//! base ingredient name, plus the descriptive words stripped from the front
//! of a name before the lookup.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Leading descriptive words removed before canonicalization
pub const DESCRIPTIVE_PREFIXES: [&str; 6] =
    ["konzerva", "glavice", "glavica", "file", "kriška", "kriska"];

/// Ground-meat idiom that always maps to [`GROUND_MEAT`]
pub const GROUND_MEAT_MARKER: &str = "mlevenog mesa";

/// Canonical name forced by [`GROUND_MEAT_MARKER`]
pub const GROUND_MEAT: &str = "mleveno meso";

/// Variant spelling -> canonical ingredient name
///
/// Keys are already normalized (lowercase, single spaces).
pub static CANONICAL_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Onion and garlic
    map.insert("crni luk", "luk");
    map.insert("crnog luka", "luk");
    map.insert("luka", "luk");
    map.insert("glavica luka", "luk");
    map.insert("beli luk", "beli luk");
    map.insert("belog luka", "beli luk");
    map.insert("čen belog luka", "beli luk");
    map.insert("čena belog luka", "beli luk");
    map.insert("cena belog luka", "beli luk");
    map.insert("mladi luk", "mladi luk");
    map.insert("mladog luka", "mladi luk");

    // Meat and fish
    map.insert("mesa", "meso");
    map.insert("mleveno meso", "mleveno meso");
    map.insert("pileći file", "piletina");
    map.insert("pileci file", "piletina");
    map.insert("pilećeg filea", "piletina");
    map.insert("pilećih prsa", "piletina");
    map.insert("pileća prsa", "piletina");
    map.insert("piletine", "piletina");
    map.insert("junetine", "junetina");
    map.insert("svinjetine", "svinjetina");
    map.insert("slanine", "slanina");
    map.insert("kobasice", "kobasica");
    map.insert("lososa", "losos");
    map.insert("tunjevine", "tuna");
    map.insert("tune", "tuna");

    // Dairy and eggs
    map.insert("jaja", "jaje");
    map.insert("jajeta", "jaje");
    map.insert("jaje", "jaje");
    map.insert("mleka", "mleko");
    map.insert("sira", "sir");
    map.insert("kačkavalja", "kačkavalj");
    map.insert("feta sira", "feta sir");
    map.insert("grcki jogurt", "grčki jogurt");
    map.insert("grčkog jogurta", "grčki jogurt");
    map.insert("grckog jogurta", "grčki jogurt");
    map.insert("jogurta", "jogurt");
    map.insert("pavlake", "pavlaka");
    map.insert("kisele pavlake", "pavlaka");
    map.insert("putera", "puter");
    map.insert("maslaca", "puter");

    // Vegetables and legumes
    map.insert("paradajza", "paradajz");
    map.insert("pelata", "paradajz pelat");
    map.insert("paprike", "paprika");
    map.insert("crvene paprike", "paprika");
    map.insert("krompira", "krompir");
    map.insert("šargarepe", "šargarepa");
    map.insert("sargarepe", "šargarepa");
    map.insert("tikvice", "tikvica");
    map.insert("kupusa", "kupus");
    map.insert("spanaća", "spanać");
    map.insert("spanaca", "spanać");
    map.insert("pečuraka", "pečurke");
    map.insert("šampinjona", "pečurke");
    map.insert("pasulja", "pasulj");
    map.insert("belog pasulja", "pasulj");
    map.insert("slanutka", "leblebije");
    map.insert("leblebija", "leblebije");
    map.insert("sočiva", "sočivo");
    map.insert("avokada", "avokado");
    map.insert("peršuna", "peršun");
    map.insert("krastavca", "krastavac");
    map.insert("krastavci", "krastavac");

    // Grains and pantry
    map.insert("brašna", "brašno");
    map.insert("brasna", "brašno");
    map.insert("pirinča", "pirinač");
    map.insert("pirinca", "pirinač");
    map.insert("ovsenih pahuljica", "ovsene pahuljice");
    map.insert("testenine", "testenina");
    map.insert("hleba", "hleb");
    map.insert("šećera", "šećer");
    map.insert("secera", "šećer");
    map.insert("meda", "med");
    map.insert("limuna", "limun");
    map.insert("sok od limuna", "limun");

    // Oils and seasoning
    map.insert("ulja", "ulje");
    map.insert("maslinovog ulja", "maslinovo ulje");
    map.insert("maslinovo ulje", "maslinovo ulje");
    map.insert("soli", "so");
    map.insert("bibera", "biber");
    map.insert("crni biber", "biber");
    map.insert("aleve paprike", "aleva paprika");
    map.insert("sušenih začina", "začin");
    map.insert("vegete", "začin");
    map.insert("lovora", "lovorov list");
    map.insert("lista lovora", "lovorov list");
    map.insert("kumina", "kumin");
    map.insert("vode", "voda");

    map
});
