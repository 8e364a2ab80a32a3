use std::sync::Arc;

use house_price::ensemble::{DecisionTreeRegressor, TreeNode};
use house_price::{Config, Estimator, HouseFeatures, ListingTable, RandomForestRegressor};

const DATA: &str = "\
area_type,availability,size,society,total_sqft,bath,balcony,price,site_location
Super built-up  Area,Ready To Move,2 BHK,Coomee ,1000,2.0,1.0,50,Aundh
Plot  Area,Ready To Move,4 Bedroom,Theanmp,2000,4.0,2.0,104,Baner
Built-up  Area,Ready To Move,3 BHK,Soiewre,1500,3.0,2.0,72,Kothrud
Super built-up  Area,Ready To Move,2 BHK,DuenaTa,1200,2.0,1.0,150,Koregaon Park
Super built-up  Area,Ready To Move,1 RK,Jaades ,450,1.0,0.0,21,Hadapsar
";

fn split(feature: usize, threshold: f64, low: f64, high: f64) -> Vec<TreeNode> {
    vec![
        TreeNode::Split {
            feature,
            threshold,
            left: 1,
            right: 2,
        },
        TreeNode::Leaf { value: low },
        TreeNode::Leaf { value: high },
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== House Price Estimate Example ===\n");

    // Step 1: Load the reference listings
    let dataset = ListingTable::from_reader(DATA.as_bytes())?;
    println!("Listings: {} kept, {} dropped", dataset.n_samples(), dataset.stats().rows_dropped());

    // Step 2: Describe the model's columns and build a small forest
    let columns: Vec<String> = ["bhk", "bath", "balcony", "new_total_sqft", "site_location_Aundh"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let trees = vec![
        DecisionTreeRegressor::new(split(3, 1200.0, 48.0, 90.0), columns.len())?,
        DecisionTreeRegressor::new(split(4, 0.5, 56.0, 52.0), columns.len())?,
    ];
    let forest = RandomForestRegressor::new(trees, columns.len())?;

    // Step 3: Assemble the estimator
    let estimator = Estimator::new(Arc::new(dataset), columns, Box::new(forest), &Config::default())?;

    // Step 4: Price a house
    let features = HouseFeatures {
        location: "Aundh".to_string(),
        room_count: 2,
        bathroom_count: 2,
        balcony_count: 1,
        area: 1000.0,
        area_type: "Super built-up  Area".to_string(),
        availability: "Ready To Move".to_string(),
    };
    let estimate = estimator.estimate(&features)?;

    println!("Estimated price: {}", estimate.prediction);
    println!("Similar locations:");
    for location in &estimate.recommendations {
        println!("  {}", location);
    }
    println!("Map: {}", estimate.map_url);

    Ok(())
}
