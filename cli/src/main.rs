use anyhow::Result;
use densemat::Matrix;
use log::info;
use std::time::Instant;

fn print_matrix(m: &Matrix<i64>) {
    println!("Rows: {}, Columns: {}\n", m.rows(), m.cols());
    println!("{m}\n");
}

fn main() -> Result<()> {
    env_logger::init();

    let m1 = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6])?;
    let m2 = Matrix::from_vec(2, 3, vec![7, 8, 9, 10, 11, 12])?;

    println!("Matrix 1");
    print_matrix(&m1);
    println!("Matrix 2");
    print_matrix(&m2);

    let start = Instant::now();
    let sum = m1.checked_add(&m2)?;
    info!("addition completed in {:?}", start.elapsed());

    println!("Matrix Sum");
    print_matrix(&sum);

    Ok(())
}
