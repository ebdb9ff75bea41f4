#![allow(dead_code)]

use std::path::PathBuf;
use uuid::Uuid;

pub const HEADER: &str = "age,sex,chest pain type,resting bp s,cholesterol,fasting blood sugar,resting ecg,max heart rate,exercise angina,oldpeak,ST slope,target";

/// Labelled rows in the published column layout. Every third row is a
/// positive with asymptomatic chest pain, exercise angina and a flat slope.
pub fn synthetic_csv(rows: usize) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for i in 0..rows {
        let sick = i % 3 == 0;
        let (cp, hr, angina, peak, slope) = if sick {
            (4, 105 + i % 25, 1, 1.2 + (i % 6) as f64 * 0.3, 2)
        } else {
            (1 + i % 3, 145 + i % 35, 0, (i % 4) as f64 * 0.2, 1)
        };
        out.push_str(&format!(
            "{},{},{cp},{},{},{},{},{hr},{angina},{peak:.1},{slope},{}\n",
            32 + (i * 7) % 45,
            i % 2,
            100 + (i * 3) % 80,
            170 + (i * 11) % 200,
            u8::from(i % 5 == 0),
            i % 3 % 2,
            u8::from(sick)
        ));
    }
    out
}

pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("heartguard-{label}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_dataset(dir: &std::path::Path, body: &str) -> PathBuf {
    let path = dir.join("heart.csv");
    std::fs::write(&path, body).unwrap();
    path
}
