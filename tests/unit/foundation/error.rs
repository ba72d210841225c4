use super::*;

#[test]
fn each_kind_names_itself_in_display() {
    let cases = [
        (WavyteError::validation("tile_width is 0"), "validation error: tile_width is 0"),
        (WavyteError::render("surface too wide"), "render error: surface too wide"),
        (WavyteError::serde("eof"), "serialization error: eof"),
    ];
    for (err, want) in cases {
        assert_eq!(err.to_string(), want);
    }
}

#[test]
fn anyhow_errors_convert_with_question_mark() {
    fn read() -> WavyteResult<()> {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "scene.json missing");
        Err::<(), _>(anyhow::Error::new(io).context("read scene"))?;
        Ok(())
    }

    let err = read().unwrap_err();
    assert!(matches!(err, WavyteError::Other(_)));
    assert_eq!(err.to_string(), "read scene");
    assert!(format!("{err:#}").contains("scene.json missing"));
}
