use crate::config::Config;
use crate::core::migrate::MigrateLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, success};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let report = MigrateLogic::sqlite_to_postgres(cfg)?;

    success(format!(
        "Copied {} students and {} responses to PostgreSQL.",
        report.alunos_copiados, report.respostas_copiadas
    ));

    header("Row counts");
    println!("{:<10} {:>8} {:>10} {:>6}", "", "alunos", "respostas", "log");
    for (label, c) in [("sqlite", &report.source), ("postgres", &report.target)] {
        println!("{label:<10} {:>8} {:>10} {:>6}", c.alunos, c.respostas, c.log);
    }
    Ok(())
}
