pub mod export {
    pub mod csv;
    pub mod xlsx;
}

pub mod import {
    pub mod csv;
    pub mod xlsx;

    use crate::domain::entities::row::Row;
    use crate::domain::entities::upload::UploadFile;
    use crate::error::DecodeError;

    /// Decodes one uploaded file. `.csv`, `.tsv` and `.txt` names go through
    /// the csv reader; everything else is handed to calamine's sniffing.
    pub fn decode_file(file: &UploadFile, max_bytes: usize) -> Result<Vec<Row>, DecodeError> {
        if file.bytes.len() > max_bytes {
            return Err(DecodeError::TooLarge {
                size: file.bytes.len(),
                limit: max_bytes,
            });
        }

        match file.extension().as_deref() {
            Some("csv") | Some("txt") => self::csv::decode_csv(&file.bytes, b','),
            Some("tsv") => self::csv::decode_csv(&file.bytes, b'\t'),
            _ => self::xlsx::decode_workbook(&file.bytes),
        }
    }
}

pub mod memory {
    pub mod repo;
}

pub mod sqlite {
    pub mod queries;
    pub mod repo;
    pub mod schema;
}
