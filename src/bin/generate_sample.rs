use anyhow::{Context, Result};

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

/// Slow random walk, the usual shape of a head-motion estimate.
fn random_walk(rng: &mut SimpleRng, n: usize, step: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(n);
    let mut current = 0.0;
    for _ in 0..n {
        current += rng.gauss(0.0, step);
        values.push(current);
    }
    values
}

/// Backward difference; fMRIPrep leaves the first derivative row as n/a.
fn derivative(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    out.push(f64::NAN);
    for pair in values.windows(2) {
        out.push(pair[1] - pair[0]);
    }
    out
}

fn squared(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v * v).collect()
}

fn format_cell(v: f64) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else {
        format!("{v:.6}")
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let n_rows = 200;

    let motion_axes = ["trans_x", "trans_y", "trans_z", "rot_x", "rot_y", "rot_z"];
    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();

    // Motion parameters with the full variant family.
    for (i, axis) in motion_axes.iter().enumerate() {
        let step = if axis.starts_with("trans") { 0.02 } else { 0.0005 };
        let base = random_walk(&mut rng, n_rows, step * (1.0 + i as f64 * 0.1));
        let deriv = derivative(&base);
        columns.push((format!("{axis}_derivative1"), deriv.clone()));
        columns.push((format!("{axis}_derivative1_power2"), squared(&deriv)));
        columns.push((format!("{axis}_power2"), squared(&base)));
        columns.push((axis.to_string(), base));
    }

    // Tissue signals and their derivative family.
    for (name, mean) in [("csf", 620.0), ("white_matter", 740.0)] {
        let base: Vec<f64> = (0..n_rows).map(|_| rng.gauss(mean, 4.0)).collect();
        let deriv = derivative(&base);
        columns.push((format!("{name}_derivative1"), deriv.clone()));
        columns.push((format!("{name}_derivative1_power2"), squared(&deriv)));
        columns.push((format!("{name}_power2"), squared(&base)));
        columns.push((name.to_string(), base));
    }

    // Discrete-cosine high-pass regressors.
    for k in 0..4 {
        let values = (0..n_rows)
            .map(|t| {
                let phase = std::f64::consts::PI * (k + 1) as f64 * (t as f64 + 0.5) / n_rows as f64;
                phase.cos()
            })
            .collect();
        columns.push((format!("cosine{k:02}"), values));
    }

    // CompCor components.
    for k in 0..6 {
        let values = (0..n_rows).map(|_| rng.gauss(0.0, 1.0)).collect();
        columns.push((format!("t_comp_cor_{k:02}"), values));
    }

    let output_path = "sample_confounds.tsv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(output_path)
        .context("creating output file")?;

    let header: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
    writer.write_record(&header).context("writing header")?;
    for row in 0..n_rows {
        let record: Vec<String> = columns.iter().map(|(_, col)| format_cell(col[row])).collect();
        writer.write_record(&record).context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    log::info!("sample confounds written to {output_path}");
    println!(
        "Wrote {} columns x {} rows to {output_path}",
        columns.len(),
        n_rows
    );
    Ok(())
}
