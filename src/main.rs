use campaign_api::rocket as build_rocket;

#[rocket::launch]
fn rocket() -> _ {
    build_rocket()
}
