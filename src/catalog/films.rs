//! Built-in film profiles.
//!
//! Parameters were fitted from manufacturer datasheets and the hand-authored
//! legacy curves, then validated against the hard-constraint battery. All of
//! them are expected to pass `validate::validate_catalog`; that expectation
//! is enforced by a test in `validate`.

use crate::domain::{FilmProfile, FilmType, ModelParams};

fn film(id: &str, film_type: FilmType, t1: f64, t2: f64, p: f64, log_k: f64, max_m: f64) -> FilmProfile {
    FilmProfile {
        id: id.to_string(),
        film_type,
        params: ModelParams { t1, t2, p, log_k, max_m },
    }
}

pub(crate) fn builtin_films() -> Vec<FilmProfile> {
    use FilmType::*;
    vec![
        // Kodak color negative / cine stocks.
        film("kodak_50d", C41, 30.0, 300.0, 0.56, 14.0, 4.0),
        film("kodak_250d", C41, 30.0, 300.0, 0.56, 15.0, 4.0),
        film("kodak_500t", C41, 30.0, 300.0, 0.56, 16.0, 4.0),
        film("kodak_portra160", C41, 30.0, 300.0, 0.56, 17.0, 4.0),
        film("kodak_portra400", C41, 30.0, 300.0, 0.56, 17.0, 4.0),
        film("kodak_portra800", C41, 30.0, 300.0, 0.56, 18.0, 4.0),
        film("kodak_portra", C41, 30.0, 300.0, 0.56, 17.0, 4.0),
        film("kodak_ektar100", C41, 30.0, 240.0, 0.63, 21.0, 4.0),
        film("kodak_gold", C41, 20.0, 240.0, 0.6, 22.0, 5.0),
        // Fuji color negative.
        film("fuji_superia", C41, 25.0, 240.0, 0.57, 17.0, 4.0),
        film("fuji_superia200", C41, 25.0, 240.0, 0.57, 17.0, 4.0),
        film("fuji_superia1600", C41, 20.0, 240.0, 0.6, 21.0, 5.0),
        film("fuji_c200", C41, 25.0, 240.0, 0.57, 17.0, 4.0),
        film("fuji_color100", C41, 25.0, 240.0, 0.57, 17.0, 4.0),
        film("fuji_pro160c", C41, 25.0, 240.0, 0.57, 17.0, 4.0),
        film("fuji_pro160ns", C41, 25.0, 240.0, 0.57, 17.0, 4.0),
        film("fuji_xtra400", C41, 25.0, 240.0, 0.57, 18.0, 4.0),
        film("fuji_nexia400", C41, 25.0, 240.0, 0.57, 18.0, 4.0),
        film("fuji_64t", C41, 20.0, 180.0, 0.44, 11.0, 3.0),
        film("fuji_pro400h", C41, 20.0, 240.0, 0.6, 19.0, 5.0),
        // Other C-41 stocks.
        film("cinestill_800t", C41, 30.0, 300.0, 0.56, 15.0, 4.0),
        film("lomo_cn", C41, 15.0, 200.0, 0.65, 27.0, 6.0),
        film("holga400", C41, 20.0, 240.0, 0.6, 22.0, 5.0),
        film("ilford_xp2", C41, 25.0, 240.0, 0.57, 19.0, 4.0),
        // Kodak black & white.
        film("kodak_trix320", BwClassic, 10.0, 120.0, 0.79, 37.0, 8.0),
        film("kodak_trix", BwClassic, 10.0, 120.0, 0.79, 37.0, 8.0),
        film("kodak_tmax100", BwModern, 60.0, 600.0, 0.44, 10.0, 3.0),
        film("kodak_tmax400", BwModern, 45.0, 600.0, 0.51, 12.0, 4.0),
        film("kodak_tmax3200", BwModern, 45.0, 600.0, 0.51, 13.0, 4.0),
        // Ilford black & white.
        film("ilford_hp5", BwClassic, 12.0, 180.0, 0.72, 34.0, 8.0),
        film("ilford_fp4", BwClassic, 10.0, 120.0, 0.68, 28.0, 6.0),
        film("ilford_delta100", BwModern, 60.0, 600.0, 0.44, 10.0, 3.0),
        film("ilford_delta400", BwModern, 45.0, 600.0, 0.51, 13.0, 4.0),
        film("ilford_delta3200", BwModern, 45.0, 600.0, 0.51, 13.0, 4.0),
        film("ilford_panf", BwClassic, 6.0, 60.0, 1.02, 48.0, 10.0),
        film("ilford_sfx", BwClassic, 12.0, 150.0, 0.78, 38.0, 8.0),
        film("ilford_kentmere100", BwClassic, 10.0, 120.0, 0.68, 28.0, 6.0),
        film("ilford_kentmere400", BwClassic, 12.0, 180.0, 0.72, 33.0, 8.0),
        // Other black & white.
        film("shanghai_gp3", BwClassic, 12.0, 150.0, 0.78, 35.0, 8.0),
        film("lomo_potsdam100", BwClassic, 10.0, 120.0, 0.79, 37.0, 8.0),
        // Slide film.
        film("kodak_e100", Slide, 4.0, 90.0, 0.31, 10.0, 3.0),
        film("fuji_provia400x", Slide, 4.0, 75.0, 0.45, 10.0, 4.0),
        film("fuji_sensia200", Slide, 4.0, 80.0, 0.44, 10.0, 4.0),
        film("fuji_t64", Slide, 3.0, 60.0, 0.44, 11.0, 4.0),
    ]
}
