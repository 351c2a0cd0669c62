pub mod entities {
    pub mod row;
    pub mod upload;
}
