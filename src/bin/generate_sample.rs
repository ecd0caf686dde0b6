use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{BooleanArray, Float64Builder, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// One-component 3D diffusion autocorrelation.
///
/// `n` particles in the focal volume, diffusion time `tau_d` (s),
/// structure parameter `sp` (axial / lateral extent).
fn diffusion_3d(tau: f64, n: f64, tau_d: f64, sp: f64) -> f64 {
    let t = tau / tau_d;
    1.0 / n / (1.0 + t) / (1.0 + t / (sp * sp)).sqrt()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Build a List<Float64> column from rows of values.
fn list_column(rows: &[Vec<f64>]) -> arrow::array::ListArray {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    builder.finish()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Lag times: 1 µs → 1 s, 20 points per decade
    let lag_times: Vec<f64> = (0..=120).map(|i| 1e-6 * 10f64.powf(i as f64 / 20.0)).collect();

    // (sample, particles in focus, diffusion time)
    let samples = [
        ("Alexa488", 4.0, 30e-6),
        ("EGFP", 8.0, 120e-6),
        ("Liposomes", 2.0, 3e-3),
    ];
    let channels = ["AC1", "AC2", "CC12"];

    let mut all_x: Vec<Vec<f64>> = Vec::new();
    let mut all_y: Vec<Vec<f64>> = Vec::new();
    let mut all_key: Vec<String> = Vec::new();
    let mut all_label: Vec<String> = Vec::new();
    let mut all_selected: Vec<bool> = Vec::new();

    for &(sample, n, tau_d) in &samples {
        for &channel in &channels {
            // Cross-correlation is weaker than the autocorrelations.
            let amplitude = if channel.starts_with("CC") { 0.6 } else { 1.0 };
            let y: Vec<f64> = lag_times
                .iter()
                .map(|&tau| {
                    // Shot noise dominates at short lag times.
                    let noise = 0.002 * (1e-5 / tau).sqrt().min(10.0);
                    amplitude * diffusion_3d(tau, n, tau_d, 5.0) + rng.gauss(0.0, noise)
                })
                .collect();

            all_key.push(format!("#{}:", all_x.len() + 1));
            all_x.push(lag_times.clone());
            all_y.push(y);
            all_label.push(format!("{channel} {sample}"));
            all_selected.push(channel.starts_with("AC"));
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::List(Arc::new(Field::new("item", DataType::Float64, true))), false),
        Field::new("y", DataType::List(Arc::new(Field::new("item", DataType::Float64, true))), false),
        Field::new("key", DataType::Utf8, false),
        Field::new("label", DataType::Utf8, false),
        Field::new("selected", DataType::Boolean, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(list_column(&all_x)),
            Arc::new(list_column(&all_y)),
            Arc::new(StringArray::from(all_key)),
            Arc::new(StringArray::from(all_label)),
            Arc::new(BooleanArray::from(all_selected)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "sample_curves.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} curves ({} lag times each) to {output_path}",
        all_x.len(),
        lag_times.len()
    );
    Ok(())
}
