//! CSV export of score matrices and scorelines.

use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::scoregrid::{ScoreMatrix, Scoreline};

pub struct CsvWriter<W: Write> {
    writer: W,
}
impl CsvWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}
impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut first = true;
        for datum in record.into_iter() {
            if first {
                first = false;
            } else {
                self.writer.write_all(",".as_bytes())?;
            }
            let str: &str = datum.as_ref();
            self.writer.write_all(str.as_bytes())?;
        }
        self.writer.write_all("\n".as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Writes the grid with a header row of away goals and one row per home goal count, each row
/// led by its home goal count.
pub fn write_score_matrix<W: Write>(
    writer: &mut CsvWriter<W>,
    scoregrid: &ScoreMatrix,
) -> Result<(), io::Error> {
    let grid = scoregrid.grid();
    let header = std::iter::once(String::from("\"\""))
        .chain((0..grid.cols()).map(|away| away.to_string()));
    writer.append(header)?;
    for home in 0..grid.rows() {
        let row = std::iter::once(home.to_string())
            .chain(grid.row_slice(home).iter().map(|prob| format!("{prob:.6}")));
        writer.append(row)?;
    }
    writer.flush()
}

pub fn write_scorelines<W: Write>(
    writer: &mut CsvWriter<W>,
    scorelines: &[Scoreline],
) -> Result<(), io::Error> {
    writer.append(["home", "away", "probability"])?;
    for scoreline in scorelines {
        writer.append([
            scoreline.home.to_string(),
            scoreline.away.to_string(),
            format!("{:.6}", scoreline.probability),
        ])?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::Matrix;

    fn to_string(writer: CsvWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn append() {
        let mut writer = CsvWriter::new(Vec::new());
        writer.append(["a", "b", "c"]).unwrap();
        writer.append(Vec::<String>::new()).unwrap();
        writer.append(vec![String::from("1")]).unwrap();
        assert_eq!("a,b,c\n\n1\n", to_string(writer));
    }

    #[test]
    fn score_matrix() {
        let mut grid = Matrix::allocate(2, 2);
        grid.row_slice_mut(0).copy_from_slice(&[0.4, 0.2]);
        grid.row_slice_mut(1).copy_from_slice(&[0.3, 0.1]);
        let scoregrid = ScoreMatrix::from_grid(grid).unwrap();
        let mut writer = CsvWriter::new(Vec::new());
        write_score_matrix(&mut writer, &scoregrid).unwrap();
        assert_eq!(
            "\"\",0,1\n0,0.400000,0.200000\n1,0.300000,0.100000\n",
            to_string(writer)
        );
    }

    #[test]
    fn score_matrix_poisson_shape() {
        let scoregrid = ScoreMatrix::from_poisson(1.65, 1.05, 8).unwrap();
        let mut writer = CsvWriter::new(Vec::new());
        write_score_matrix(&mut writer, &scoregrid).unwrap();
        let csv = to_string(writer);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(10, lines.len());
        assert_eq!("\"\",0,1,2,3,4,5,6,7,8", lines[0]);
        assert!(lines.iter().all(|line| line.split(',').count() == 10));
        assert!(lines[1].starts_with("0,0.067209,"));
    }

    #[test]
    fn scorelines() {
        let scorelines = [
            Scoreline {
                home: 1,
                away: 1,
                probability: 0.11644041303705609,
            },
            Scoreline {
                home: 1,
                away: 0,
                probability: 0.11089563146386293,
            },
        ];
        let mut writer = CsvWriter::new(Vec::new());
        write_scorelines(&mut writer, &scorelines).unwrap();
        assert_eq!(
            "home,away,probability\n1,1,0.116440\n1,0,0.110896\n",
            to_string(writer)
        );
    }
}
