use arrow::{
    array::{ArrayRef, BooleanArray, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use pram::{
    conversion::{coerce_to_strings, column_to_strings},
    perturb, Pram, PramOptions, Replacer, TransitionMatrix, WeightingParameters,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{collections::HashSet, sync::Arc};

// Chi-square critical value for one degree of freedom at p = 0.001
const CHI_SQUARE_CRITICAL_DF1: f64 = 10.828;

fn adults() -> RecordBatch {
    let age = Int32Array::from(vec![39, 50, 38, 53, 28, 37, 49, 52, 31, 42, 37, 30]);
    let workclass = StringArray::from(vec![
        "State-gov",
        "Self-emp",
        "Private",
        "Private",
        "Private",
        "Private",
        "Private",
        "Self-emp",
        "Private",
        "Private",
        "Private",
        "State-gov",
    ]);
    let education = StringArray::from(vec![
        Some("Bachelors"),
        Some("Bachelors"),
        Some("HS-grad"),
        Some("11th"),
        Some("Bachelors"),
        Some("Masters"),
        None,
        Some("HS-grad"),
        Some("Masters"),
        Some("Bachelors"),
        Some("Some-college"),
        Some("Bachelors"),
    ]);
    let married = BooleanArray::from(vec![
        false, true, false, true, true, true, false, true, false, true, true, true,
    ]);

    let schema = Schema::new(vec![
        Field::new("age", DataType::Int32, false),
        Field::new("workclass", DataType::Utf8, false),
        Field::new("education", DataType::Utf8, true),
        Field::new("married", DataType::Boolean, false),
    ]);

    let columns: Vec<ArrayRef> = vec![
        Arc::new(age),
        Arc::new(workclass),
        Arc::new(education),
        Arc::new(married),
    ];

    RecordBatch::try_new(Arc::new(schema), columns).unwrap()
}

fn single_column(name: &str, values: Vec<&str>) -> RecordBatch {
    let schema = Schema::new(vec![Field::new(name, DataType::Utf8, false)]);
    RecordBatch::try_new(Arc::new(schema), vec![Arc::new(StringArray::from(values))]).unwrap()
}

#[test]
fn alpha_zero_leaves_dataset_unchanged() {
    let data = adults();
    let options = PramOptions::new(0.8, 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(2021);

    let result = perturb(&data, &options, &mut rng).unwrap();

    assert_eq!(result, coerce_to_strings(&data).unwrap());
}

#[test]
fn perturbation_preserves_shape_and_domains() {
    let data = adults();
    let options = PramOptions::new(0.1, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    let result = perturb(&data, &options, &mut rng).unwrap();

    assert_eq!(result.num_rows(), data.num_rows());
    assert_eq!(result.num_columns(), data.num_columns());

    for (index, field) in data.schema().fields().iter().enumerate() {
        assert_eq!(result.schema().field(index).name(), field.name());

        let domain: HashSet<String> = column_to_strings(data.column(index))
            .unwrap()
            .into_iter()
            .collect();

        for value in column_to_strings(result.column(index)).unwrap() {
            assert!(
                domain.contains(&value),
                "{:?} is not in the domain of {}",
                value,
                field.name()
            );
        }
    }
}

#[test]
fn only_selected_columns_change() {
    let data = adults();
    let options = PramOptions::new(0.0, 1.0)
        .unwrap()
        .with_columns(&["workclass"]);

    let result = Pram::with_seed(options, 17).transform_records(&data).unwrap();
    let coerced = coerce_to_strings(&data).unwrap();

    for index in [0, 2, 3].iter() {
        assert_eq!(result.column(*index), coerced.column(*index));
    }
}

#[test]
fn single_distinct_value_is_never_perturbed() {
    let data = single_column("x", vec!["X", "X", "X"]);

    for (m, alpha) in [(0.0, 1.0), (0.8, 0.5), (1.0, 0.0)].iter() {
        let options = PramOptions::new(*m, *alpha).unwrap();
        let fitted = pram::fit(&data, &options).unwrap();
        assert_eq!(fitted["x"].column("X"), Some(&[1.0][..]));

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(perturb(&data, &options, &mut rng).unwrap(), data);
    }
}

#[test]
fn empirical_distribution_is_reproduced() {
    let matrix = TransitionMatrix::from_values(&["A", "A", "A", "B"])
        .weighted(&WeightingParameters::new(0.0, 1.0).unwrap());
    let expected_a = matrix.probability("A", "A").unwrap();
    assert!((expected_a - 0.75).abs() < 1e-9);

    let replacer = Replacer::new("letters", matrix).unwrap();
    let mut rng = StdRng::seed_from_u64(1234);

    let draws = 10_000;
    let mut observed_a = 0;
    for _ in 0..draws {
        if replacer.replace("A", &mut rng).unwrap() == "A" {
            observed_a += 1;
        }
    }

    let observed = [observed_a as f64, (draws - observed_a) as f64];
    let expected = [expected_a * draws as f64, (1.0 - expected_a) * draws as f64];
    let chi_square: f64 = observed
        .iter()
        .zip(expected.iter())
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum();

    assert!(
        chi_square < CHI_SQUARE_CRITICAL_DF1,
        "chi-square statistic {} exceeds {}",
        chi_square,
        CHI_SQUARE_CRITICAL_DF1
    );
}

#[test]
fn zero_rows_is_a_no_op() {
    let data = single_column("x", vec![]);
    let mut rng = StdRng::seed_from_u64(0);

    let result = perturb(&data, &PramOptions::default(), &mut rng).unwrap();

    assert_eq!(result.num_rows(), 0);
    assert_eq!(result.num_columns(), 1);
}

#[test]
fn zero_columns_is_a_no_op() {
    let options = arrow::record_batch::RecordBatchOptions::new().with_row_count(Some(3));
    let data = RecordBatch::try_new_with_options(Arc::new(Schema::empty()), vec![], &options)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let result = perturb(&data, &PramOptions::default(), &mut rng).unwrap();

    assert_eq!(result.num_rows(), 3);
    assert_eq!(result.num_columns(), 0);
}
