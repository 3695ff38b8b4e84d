mod diagnosis_prompt_test;
mod input_media_test;
