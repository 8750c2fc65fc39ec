use crate::config::{ByteOrder, LoadOptions};
use crate::errors::FastTextError;
use crate::model::{FILE_FORMAT_MAGIC, Model};
use crate::test_utils::{ModelBuilder, input_value, ngram_value};

#[test]
fn test_load_big_endian() {
    let bytes = ModelBuilder::new().words(["</s>", "hi"]).build();
    let model = Model::read(bytes.as_slice()).unwrap();

    assert_eq!(model.version(), 12);
    assert_eq!(model.dimension(), 4);
    assert_eq!(model.args().bucket(), 10);
    assert_eq!(model.dictionary().len(), 2);
    assert_eq!(model.dictionary().get("hi").unwrap().index(), 1);

    assert_eq!(model.input_matrix().rows(), 10);
    assert_eq!(model.input_matrix().cols(), 4);
    assert_eq!(model.input_matrix().at(1, 2), Some(input_value(1, 2)));
    assert_eq!(model.ngram_matrix().at(7, 3), Some(ngram_value(7, 3)));
}

#[test]
fn test_load_consumes_whole_stream() {
    let bytes = ModelBuilder::new().words(["a", "b"]).build();
    let mut rdr = bytes.as_slice();
    Model::read(&mut rdr).unwrap();
    assert!(rdr.is_empty());
}

#[test]
fn test_little_endian_is_detected() {
    let builder = ModelBuilder::new().words(["</s>", "hi", "東京"]);
    let big = Model::read(builder.build().as_slice()).unwrap();
    let little = Model::read(
        builder
            .byte_order(ByteOrder::LittleEndian)
            .build()
            .as_slice(),
    )
    .unwrap();

    assert_eq!(big.args(), little.args());
    assert_eq!(
        big.dictionary().words().collect::<Vec<_>>(),
        little.dictionary().words().collect::<Vec<_>>()
    );
    assert_eq!(big.input_matrix(), little.input_matrix());
    assert_eq!(big.ngram_matrix(), little.ngram_matrix());
    assert_eq!(big.word_vector("東京都"), little.word_vector("東京都"));
}

#[test]
fn test_fixed_byte_order() {
    let bytes = ModelBuilder::new()
        .byte_order(ByteOrder::LittleEndian)
        .words(["hi"])
        .build();

    let options = LoadOptions::new().byte_order(ByteOrder::LittleEndian);
    assert!(Model::read_with_options(bytes.as_slice(), &options).is_ok());

    let options = LoadOptions::new().byte_order(ByteOrder::BigEndian);
    let result = Model::read_with_options(bytes.as_slice(), &options);
    assert!(matches!(
        result,
        Err(FastTextError::BadMagicOrVersion { version: None, .. })
    ));
}

#[test]
fn test_bad_magic_stops_reading() {
    let bytes = ModelBuilder::new().magic(12345).words(["hi"]).build();
    let mut rdr = bytes.as_slice();
    let result = Model::read(&mut rdr);

    assert!(matches!(
        result,
        Err(FastTextError::BadMagicOrVersion {
            magic: 12345,
            version: None,
        })
    ));
    assert_eq!(rdr.len(), bytes.len() - 4);
}

#[test]
fn test_version_too_new() {
    let bytes = ModelBuilder::new().version(13).words(["hi"]).build();
    let result = Model::read(bytes.as_slice());
    assert!(matches!(
        result,
        Err(FastTextError::BadMagicOrVersion {
            magic: FILE_FORMAT_MAGIC,
            version: Some(13),
        })
    ));
}

#[test]
fn test_max_version_option() {
    let bytes = ModelBuilder::new().version(12).words(["hi"]).build();
    let options = LoadOptions::new().max_version(11);
    assert!(matches!(
        Model::read_with_options(bytes.as_slice(), &options),
        Err(FastTextError::BadMagicOrVersion {
            version: Some(12),
            ..
        })
    ));

    let bytes = ModelBuilder::new().version(10).words(["hi"]).build();
    assert_eq!(Model::read(bytes.as_slice()).unwrap().version(), 10);
}

#[test]
fn test_legacy_supervised_disables_ngrams() {
    let bytes = ModelBuilder::new()
        .version(11)
        .model(3)
        .words(["hi"])
        .build();
    let model = Model::read(bytes.as_slice()).unwrap();

    assert_eq!(model.args().max_n(), 0);
    assert!(model.word_ngrams("hi").is_empty());
    assert_eq!(model.word_vector("hi").as_slice(), model.input_matrix().row(0));
    assert!(model.word_vector("unknown").as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_legacy_rule_needs_both_conditions() {
    for (version, model) in [(11, 1), (11, 2), (12, 3), (10, 3)] {
        let bytes = ModelBuilder::new()
            .version(version)
            .model(model)
            .words(["hi"])
            .build();
        let model = Model::read(bytes.as_slice()).unwrap();
        assert_eq!(model.args().max_n(), 1, "version={version}");
        assert!(!model.word_ngrams("hi").is_empty());
    }
}

#[test]
fn test_unknown_model_kind() {
    let bytes = ModelBuilder::new().model(4).words(["hi"]).build();
    assert!(matches!(
        Model::read(bytes.as_slice()),
        Err(FastTextError::UnknownModelKind(4))
    ));
}

#[test]
fn test_quantized_model_is_rejected_before_matrices() {
    let bytes = ModelBuilder::new().quantized().words(["hi"]).build();
    let mut rdr = bytes.as_slice();
    assert!(matches!(
        Model::read(&mut rdr),
        Err(FastTextError::UnsupportedQuantizedModel)
    ));
    assert!(rdr.is_empty());
}

#[test]
fn test_every_prefix_is_truncated() {
    let bytes = ModelBuilder::new()
        .dim(2)
        .bucket(2)
        .words(["a", "bc"])
        .build();
    assert!(Model::read(bytes.as_slice()).is_ok());

    for len in 0..bytes.len() {
        let result = Model::read(&bytes[..len]);
        assert!(
            matches!(result, Err(FastTextError::TruncatedInput { .. })),
            "len={len}"
        );
    }
}

#[test]
fn test_truncated_field_names() {
    let bytes = ModelBuilder::new().words(["hi"]).build();
    assert!(matches!(
        Model::read(&bytes[..6]),
        Err(FastTextError::TruncatedInput { field: "version" })
    ));
    assert!(matches!(
        Model::read(&bytes[..bytes.len() - 1]),
        Err(FastTextError::TruncatedInput {
            field: "quant_output"
        })
    ));
    assert!(matches!(
        Model::read(&bytes[..bytes.len() - 5]),
        Err(FastTextError::TruncatedInput {
            field: "ngram_matrix"
        })
    ));
}

#[test]
fn test_huge_row_count_without_data() {
    for m in [1i64 << 61, 1 << 40, 40] {
        let bytes = ModelBuilder::new()
            .words(["hi"])
            .matrix_shape(m, 4)
            .omit_matrices()
            .build();
        assert!(
            matches!(
                Model::read(bytes.as_slice()),
                Err(FastTextError::TruncatedInput {
                    field: "input_matrix"
                })
            ),
            "m={m}"
        );
    }
}

#[test]
fn test_inconsistent_matrix_shapes() {
    let cases = [
        ModelBuilder::new().words(["hi"]).matrix_shape(20, 3),
        ModelBuilder::new().words(["hi"]).matrix_shape(19, 4),
        ModelBuilder::new().words(["hi"]).matrix_shape(-2, 4),
        ModelBuilder::new().words(["hi"]).matrix_shape(20, -4),
        ModelBuilder::new().words(["hi"]).matrix_shape(10, 4),
        ModelBuilder::new().words(["a", "b", "c"]).ngram_range(1, 0).matrix_shape(4, 4),
        ModelBuilder::new().words(["hi"]).bucket(0),
    ];
    for (i, builder) in cases.iter().enumerate() {
        assert!(
            matches!(
                Model::read(builder.build().as_slice()),
                Err(FastTextError::InvalidFormat(_))
            ),
            "case {i}"
        );
    }
}

#[test]
fn test_without_ngrams_bucket_is_not_checked() {
    let bytes = ModelBuilder::new()
        .ngram_range(1, 0)
        .words(["a", "b"])
        .matrix_shape(4, 4)
        .build();
    let model = Model::read(bytes.as_slice()).unwrap();
    assert_eq!(model.input_matrix().rows(), 2);
}

#[test]
fn test_negative_dimension() {
    let bytes = ModelBuilder::new().dim(-1).words(["hi"]).build();
    assert!(matches!(
        Model::read(bytes.as_slice()),
        Err(FastTextError::InvalidFormat(_))
    ));
}

#[test]
fn test_invalid_utf8_word() {
    let bytes = ModelBuilder::new().raw_word(&[0xff, 0xfe]).build();
    assert!(matches!(
        Model::read(bytes.as_slice()),
        Err(FastTextError::Utf8(_))
    ));
}

#[test]
fn test_empty_vocabulary() {
    let bytes = ModelBuilder::new().ngram_range(1, 0).bucket(0).build();
    let model = Model::read(bytes.as_slice()).unwrap();
    assert!(model.dictionary().is_empty());
    assert_eq!(model.word_vector("anything").as_slice(), &[0.0; 4]);
}
